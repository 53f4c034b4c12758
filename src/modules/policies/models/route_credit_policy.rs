use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ConfigurationError;

/// Installment payment frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    /// Nominal number of days between consecutive due dates
    pub fn interval_days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Biweekly => 15,
            Self::Monthly => 30,
        }
    }

    /// Number of installments needed to cover `term_days` (ceiling division)
    pub fn installment_count(&self, term_days: i32) -> usize {
        if term_days <= 0 {
            return 0;
        }
        let term = term_days as i64;
        let interval = self.interval_days();
        ((term + interval - 1) / interval) as usize
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(ConfigurationError::InvalidFrequency(other.to_string())),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Per-route credit origination rules. Read-only to the ledger engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCreditPolicy {
    pub route_id: String,
    pub amount_min: Decimal,
    pub amount_max: Decimal,
    pub term_min: i32,
    pub term_max: i32,
    pub allowed_frequencies: BTreeSet<Frequency>,
    pub interest_rate_percent: Decimal,
    pub max_active_credits_per_client: i32,
}

impl RouteCreditPolicy {
    pub fn allows_amount(&self, amount: Decimal) -> bool {
        amount >= self.amount_min && amount <= self.amount_max
    }

    pub fn allows_term(&self, term_days: i32) -> bool {
        term_days >= self.term_min && term_days <= self.term_max
    }

    pub fn allows_frequency(&self, frequency: Frequency) -> bool {
        self.allowed_frequencies.contains(&frequency)
    }

    /// Parse the stored comma-separated frequency list
    pub fn parse_frequencies(raw: &str) -> Result<BTreeSet<Frequency>, ConfigurationError> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Frequency::from_str)
            .collect()
    }

    /// Serialize the frequency set for storage
    pub fn format_frequencies(frequencies: &BTreeSet<Frequency>) -> String {
        frequencies
            .iter()
            .map(Frequency::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Global lending settings, injected into the service at construction
#[derive(Debug, Clone, PartialEq)]
pub struct LendingSettings {
    /// Largest single payment, as a percent of the credit's initial total debt
    pub max_partial_payment_percent: Decimal,
}

impl Default for LendingSettings {
    fn default() -> Self {
        Self {
            max_partial_payment_percent: Decimal::ONE_HUNDRED,
        }
    }
}
