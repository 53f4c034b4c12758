use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What moved the register balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Disbursement,
    Collection,
    TransferIn,
    TransferOut,
    Expense,
}

/// Accounting side of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disbursement => "disbursement",
            Self::Collection => "collection",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::Expense => "expense",
        }
    }

    /// Income kinds add to the balance, expense kinds subtract
    pub fn category(&self) -> EntryCategory {
        match self {
            Self::Collection | Self::TransferIn => EntryCategory::Income,
            Self::Disbursement | Self::TransferOut | Self::Expense => EntryCategory::Expense,
        }
    }

    /// Agent-facing movements need an open shift; transfers record one only if present
    pub fn requires_shift(&self) -> bool {
        matches!(self, Self::Disbursement | Self::Collection | Self::Expense)
    }

    /// Balance after applying `amount` in this kind's direction
    pub fn apply(&self, balance_before: Decimal, amount: Decimal) -> Decimal {
        match self.category() {
            EntryCategory::Income => balance_before + amount,
            EntryCategory::Expense => balance_before - amount,
        }
    }
}

impl EntryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for EntryKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "disbursement" => Ok(Self::Disbursement),
            "collection" => Ok(Self::Collection),
            "transfer_in" => Ok(Self::TransferIn),
            "transfer_out" => Ok(Self::TransferOut),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Invalid ledger entry kind: {}", value)),
        }
    }
}

/// Append-only record of one register balance change.
///
/// `balance_after == kind.apply(balance_before, amount)` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub register_id: String,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub category: EntryCategory,
    pub description: String,
    pub user_id: String,
    pub shift_id: Option<String>,
    pub client_id: Option<String>,
    pub credit_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Descriptive data attached to a ledger movement
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMeta {
    pub kind: EntryKind,
    pub description: String,
    pub user_id: String,
    pub client_id: Option<String>,
    pub credit_id: Option<String>,
    pub payment_id: Option<String>,
}

impl EntryMeta {
    pub fn new(kind: EntryKind, description: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            user_id: user_id.into(),
            client_id: None,
            credit_id: None,
            payment_id: None,
        }
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_credit(mut self, credit_id: impl Into<String>) -> Self {
        self.credit_id = Some(credit_id.into());
        self
    }

    pub fn with_payment(mut self, payment_id: impl Into<String>) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }
}

impl LedgerEntry {
    pub fn record(
        register_id: String,
        amount: Decimal,
        balance_before: Decimal,
        shift_id: Option<String>,
        meta: EntryMeta,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            register_id,
            kind: meta.kind,
            amount,
            balance_before,
            balance_after: meta.kind.apply(balance_before, amount),
            category: meta.kind.category(),
            description: meta.description,
            user_id: meta.user_id,
            shift_id,
            client_id: meta.client_id,
            credit_id: meta.credit_id,
            payment_id: meta.payment_id,
            created_at,
        }
    }

    /// True when before/after agree with the kind's sign
    pub fn is_balanced(&self) -> bool {
        self.category == self.kind.category()
            && self.balance_after == self.kind.apply(self.balance_before, self.amount)
    }
}
