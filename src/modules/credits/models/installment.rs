use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Not yet fully paid
    Unpaid,
    /// `paid_amount` reached `amount`
    Paid,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for InstallmentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Invalid installment status: {}", value)),
        }
    }
}

/// One scheduled slice of a credit's total debt.
///
/// Invariants: `paid_amount <= amount` and `status == Paid` exactly when `paid_amount >= amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: String,
    pub credit_id: String,
    /// Sequential number (1, 2, 3...)
    pub installment_number: i32,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Installment {
    /// Create an unpaid installment
    pub fn new(
        credit_id: String,
        installment_number: i32,
        amount: Decimal,
        due_date: NaiveDate,
        created_at: NaiveDateTime,
    ) -> Result<Self> {
        if installment_number < 1 {
            return Err(AppError::internal(format!(
                "Installment number must be positive, got {}",
                installment_number
            )));
        }

        if amount <= Decimal::ZERO {
            return Err(AppError::internal("Installment amount must be positive"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            credit_id,
            installment_number,
            amount,
            paid_amount: Decimal::ZERO,
            due_date,
            status: InstallmentStatus::Unpaid,
            created_at,
            updated_at: created_at,
        })
    }

    /// Amount still owed on this installment
    pub fn outstanding(&self) -> Decimal {
        self.amount - self.paid_amount
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Record an applied amount; returns true when this settles the installment
    pub fn apply(&mut self, applied: Decimal, at: NaiveDateTime) -> Result<bool> {
        if applied < Decimal::ZERO || applied > self.outstanding() {
            return Err(AppError::consistency(format!(
                "Cannot apply {} to installment {} with {} outstanding",
                applied,
                self.id,
                self.outstanding()
            )));
        }

        self.paid_amount += applied;
        if self.paid_amount >= self.amount {
            self.status = InstallmentStatus::Paid;
        }
        self.updated_at = at;

        Ok(self.is_paid())
    }
}
