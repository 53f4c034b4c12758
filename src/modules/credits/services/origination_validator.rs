use std::str::FromStr;

use crate::core::{money, ConfigurationError, Result, UnitOfWork, ValidationError};
use crate::modules::clients::models::ClientRecord;
use crate::modules::credits::models::CreditApplication;
use crate::modules::policies::models::{Frequency, RouteCreditPolicy};
use crate::modules::registers::models::{CashRegister, Shift};

/// Everything the origination rules looked at, still locked in the caller's unit of work
#[derive(Debug, Clone)]
pub struct ValidatedOrigination {
    pub policy: RouteCreditPolicy,
    pub frequency: Frequency,
    pub register: CashRegister,
    pub shift: Shift,
    pub client: ClientRecord,
}

/// Ordered rule chain gating credit disbursement
pub struct CreditOriginationValidator;

impl CreditOriginationValidator {
    /// Run every origination rule in order and stop at the first failure.
    ///
    /// The register and client rows are locked through `uow`, so the balance and
    /// active-credit checks hold until the caller commits.
    pub async fn validate<U: UnitOfWork>(
        uow: &mut U,
        application: &CreditApplication,
    ) -> Result<ValidatedOrigination> {
        let policy = uow
            .find_route_policy(&application.route_id)
            .await?
            .ok_or_else(|| ConfigurationError::NoPolicyForRoute {
                route_id: application.route_id.clone(),
            })?;

        money::validate_positive_amount(application.amount)?;
        if !policy.allows_amount(application.amount) {
            return Err(ValidationError::AmountOutOfRange {
                min: policy.amount_min,
                max: policy.amount_max,
            }
            .into());
        }

        if !policy.allows_term(application.term_days) {
            return Err(ValidationError::TermOutOfRange {
                min: policy.term_min,
                max: policy.term_max,
            }
            .into());
        }

        let frequency = match Frequency::from_str(&application.frequency) {
            Ok(frequency) if policy.allows_frequency(frequency) => frequency,
            _ => {
                return Err(
                    ValidationError::FrequencyNotAllowed(application.frequency.clone()).into(),
                )
            }
        };

        let register = uow
            .lock_register_for_route(&application.route_id)
            .await?
            .ok_or(ValidationError::NoRegisterForRoute)?;
        if !register.is_open() {
            return Err(ValidationError::RegisterClosed.into());
        }

        if register.current_balance < application.amount {
            return Err(ValidationError::InsufficientRegisterBalance {
                available: register.current_balance,
                requested: application.amount,
            }
            .into());
        }

        let client = match uow.lock_client(&application.client_id).await? {
            Some(client) if client.verified && client.route_id == application.route_id => client,
            _ => return Err(ValidationError::InvalidClient.into()),
        };

        let shift = uow
            .find_open_shift(&register.id)
            .await?
            .ok_or(ValidationError::NoActiveShift)?;

        let active = uow.count_unpaid_credits(&client.id).await?;
        if active >= i64::from(policy.max_active_credits_per_client) {
            return Err(ValidationError::ActiveCreditLimitReached {
                limit: policy.max_active_credits_per_client,
            }
            .into());
        }

        Ok(ValidatedOrigination {
            policy,
            frequency,
            register,
            shift,
            client,
        })
    }
}
