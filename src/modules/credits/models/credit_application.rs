use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to disburse a new credit, as received from an authenticated agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditApplication {
    pub client_id: String,
    pub route_id: String,
    pub product_id: String,
    /// Agent requesting the disbursement
    pub user_id: String,
    pub amount: Decimal,
    pub term_days: i32,
    /// Raw frequency name; checked against the route policy during validation
    pub frequency: String,
}
