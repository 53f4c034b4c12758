use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::{BusinessClock, ConfigurationError, Result};
use crate::modules::policies::models::LendingSettings;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Knobs of the ledger workflows
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Largest single payment as a percent of the credit's initial total debt
    pub max_partial_payment_percent: Decimal,
    /// Bounded wait for row locks before a workflow fails with `Busy`
    pub lock_wait_timeout_secs: u64,
    /// Offset of the business-local calendar from UTC
    pub business_utc_offset_minutes: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            ledger: LedgerConfig {
                max_partial_payment_percent: parse_var("MAX_PARTIAL_PAYMENT_PERCENT", "100")?,
                lock_wait_timeout_secs: parse_var("LOCK_WAIT_TIMEOUT_SECS", "5")?,
                business_utc_offset_minutes: parse_var("BUSINESS_UTC_OFFSET_MINUTES", "0")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.ledger.validate()?;

        if self.database.max_connections == 0 {
            return Err(ConfigurationError::InvalidSetting(
                "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_partial_payment_percent <= Decimal::ZERO
            || self.max_partial_payment_percent > Decimal::ONE_HUNDRED
        {
            return Err(ConfigurationError::InvalidSetting(format!(
                "MAX_PARTIAL_PAYMENT_PERCENT must be in (0, 100], got {}",
                self.max_partial_payment_percent
            ))
            .into());
        }

        if self.lock_wait_timeout_secs == 0 {
            return Err(ConfigurationError::InvalidSetting(
                "LOCK_WAIT_TIMEOUT_SECS must be greater than 0".to_string(),
            )
            .into());
        }

        BusinessClock::with_offset_minutes(self.business_utc_offset_minutes)?;
        Ok(())
    }

    pub fn lending_settings(&self) -> LendingSettings {
        LendingSettings {
            max_partial_payment_percent: self.max_partial_payment_percent,
        }
    }

    pub fn business_clock(&self) -> Result<BusinessClock> {
        BusinessClock::with_offset_minutes(self.business_utc_offset_minutes)
    }
}

/// Read an env var, falling back to `default`, and parse it
pub(crate) fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidSetting(format!("Invalid {}", name)).into())
}
