use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a register accepts movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    Open,
    Closed,
}

impl RegisterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for RegisterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for RegisterStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Invalid register status: {}", value)),
        }
    }
}

/// Cash balance held for a route. Only changed together with a ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashRegister {
    pub id: String,
    pub route_id: String,
    pub current_balance: Decimal,
    pub status: RegisterStatus,
    pub updated_at: NaiveDateTime,
}

impl CashRegister {
    pub fn new(id: impl Into<String>, route_id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: id.into(),
            route_id: route_id.into(),
            current_balance: balance,
            status: RegisterStatus::Open,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }
}
