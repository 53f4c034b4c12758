use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::credits::models::CreditApplication;

fn default_method() -> String {
    "cash".to_string()
}

/// Body of `POST /api/credits`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginateCreditRequest {
    pub client_id: String,
    pub route_id: String,
    pub product_id: String,
    pub amount: Decimal,
    pub term_days: i32,
    pub frequency: String,
}

impl OriginateCreditRequest {
    pub fn into_application(self, user_id: impl Into<String>) -> CreditApplication {
        CreditApplication {
            client_id: self.client_id,
            route_id: self.route_id,
            product_id: self.product_id,
            user_id: user_id.into(),
            amount: self.amount,
            term_days: self.term_days,
            frequency: self.frequency,
        }
    }
}

/// Body of `POST /api/credits/{id}/payments`. A zero amount records a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Body of `POST /api/registers/transfers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCashRequest {
    pub from_register_id: String,
    pub to_register_id: String,
    pub amount: Decimal,
}

/// Body of `POST /api/registers/{id}/expenses`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordExpenseRequest {
    pub amount: Decimal,
    pub description: String,
}
