use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{money, AppError, Result, ValidationError};
use crate::modules::policies::Frequency;

/// Credit lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    /// Outstanding balance remains
    Unpaid,
    /// Balance fully collected
    Paid,
}

impl CreditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for CreditStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Invalid credit status: {}", value)),
        }
    }
}

/// A disbursed loan with flat add-on interest and a declining balance.
///
/// Invariants: `0 <= balance <= total_debt` and `status == Paid` exactly when `balance <= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub id: String,
    pub principal: Decimal,
    pub term_days: i32,
    pub frequency: Frequency,
    pub interest_rate_percent: Decimal,
    /// `principal * rate / 100`, rounded to cents
    pub interest_amount: Decimal,
    /// `principal + interest_amount`
    pub total_debt: Decimal,
    pub balance: Decimal,
    pub status: CreditStatus,
    pub client_id: String,
    pub user_id: String,
    pub product_id: String,
    pub route_id: String,
    pub shift_id: String,
    pub due_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Inputs for a new credit once origination rules have passed
#[derive(Debug, Clone)]
pub struct NewCredit {
    pub principal: Decimal,
    pub term_days: i32,
    pub frequency: Frequency,
    pub interest_rate_percent: Decimal,
    pub client_id: String,
    pub user_id: String,
    pub product_id: String,
    pub route_id: String,
    pub shift_id: String,
    pub disbursed_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Flat add-on interest on a principal
pub fn interest_for(principal: Decimal, interest_rate_percent: Decimal) -> Decimal {
    money::round2(principal * interest_rate_percent / Decimal::ONE_HUNDRED)
}

impl Credit {
    /// Build a fresh unpaid credit whose balance equals its total debt
    pub fn originate(new: NewCredit) -> Result<Self> {
        money::validate_positive_amount(new.principal)?;
        if new.term_days <= 0 {
            return Err(ValidationError::InvalidTerm(new.term_days).into());
        }

        let interest_amount = interest_for(new.principal, new.interest_rate_percent);
        let total_debt = new.principal + interest_amount;
        let due_date = new
            .disbursed_on
            .checked_add_days(chrono::Days::new(new.term_days as u64))
            .ok_or_else(|| AppError::internal("Failed to calculate credit due date"))?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            principal: new.principal,
            term_days: new.term_days,
            frequency: new.frequency,
            interest_rate_percent: new.interest_rate_percent,
            interest_amount,
            total_debt,
            balance: total_debt,
            status: CreditStatus::Unpaid,
            client_id: new.client_id,
            user_id: new.user_id,
            product_id: new.product_id,
            route_id: new.route_id,
            shift_id: new.shift_id,
            due_date,
            created_at: new.created_at,
            updated_at: new.created_at,
        })
    }

    pub fn is_paid(&self) -> bool {
        self.status == CreditStatus::Paid
    }

    /// Reduce the balance by a collected amount and settle the status
    pub fn apply_payment(&mut self, amount: Decimal, at: NaiveDateTime) -> Result<()> {
        if amount > self.balance {
            return Err(ValidationError::PaymentExceedsOutstandingBalance {
                balance: self.balance,
            }
            .into());
        }

        self.balance -= amount;
        self.status = if self.balance <= Decimal::ZERO {
            CreditStatus::Paid
        } else {
            CreditStatus::Unpaid
        };
        self.updated_at = at;

        Ok(())
    }
}
