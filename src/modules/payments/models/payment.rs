use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of collection event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Money collected against the credit
    Payment,
    /// Agent visited the client without collecting
    Visit,
}

impl PaymentType {
    pub fn for_amount(amount: Decimal) -> Self {
        if amount.is_zero() {
            Self::Visit
        } else {
            Self::Payment
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Visit => "visit",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PaymentType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "payment" => Ok(Self::Payment),
            "visit" => Ok(Self::Visit),
            _ => Err(format!("Invalid payment type: {}", value)),
        }
    }
}

/// Payments recorded by the engine are always approved on creation
pub const PAYMENT_STATUS_APPROVED: &str = "approved";

/// A collection event against a credit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub credit_id: String,
    pub amount: Decimal,
    pub method: String,
    pub payment_type: PaymentType,
    pub status: String,
    pub client_id: String,
    pub user_id: String,
    pub shift_id: String,
    /// Where the agent collected, if reported
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Payment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credit_id: String,
        amount: Decimal,
        method: String,
        client_id: String,
        user_id: String,
        shift_id: String,
        location: Option<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            credit_id,
            payment_type: PaymentType::for_amount(amount),
            amount,
            method,
            status: PAYMENT_STATUS_APPROVED.to_string(),
            client_id,
            user_id,
            shift_id,
            location,
            created_at,
        }
    }

    pub fn is_visit(&self) -> bool {
        self.payment_type == PaymentType::Visit
    }
}
