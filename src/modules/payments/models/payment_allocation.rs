use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How much of a payment landed on one installment.
///
/// `amount_applied == capital_portion + interest_portion` within rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub payment_id: String,
    pub installment_id: String,
    pub amount_applied: Decimal,
    pub capital_portion: Decimal,
    pub interest_portion: Decimal,
    pub created_at: NaiveDateTime,
}

/// Allocation computed by the engine before a payment row exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAllocation {
    pub installment_id: String,
    pub amount_applied: Decimal,
    pub capital_portion: Decimal,
    pub interest_portion: Decimal,
    /// The installment became fully paid by this allocation
    pub settles_installment: bool,
}

impl PlannedAllocation {
    pub fn into_allocation(self, payment_id: &str, created_at: NaiveDateTime) -> PaymentAllocation {
        PaymentAllocation {
            payment_id: payment_id.to_string(),
            installment_id: self.installment_id,
            amount_applied: self.amount_applied,
            capital_portion: self.capital_portion,
            interest_portion: self.interest_portion,
            created_at,
        }
    }
}
