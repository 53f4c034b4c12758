use rust_decimal::{Decimal, RoundingStrategy};

use super::error::ValidationError;

/// Decimal places carried by every stored amount
pub const MONEY_SCALE: u32 = 2;

/// Rounds half away from zero to cents, the rule used for every stored amount.
/// The result always carries exactly two decimal places.
pub fn round2(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Validates that an incoming amount is non-negative and has at most two decimals
pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::InvalidAmount(format!(
            "amount cannot be negative, got {}",
            amount
        )));
    }

    if amount.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::InvalidAmount(format!(
            "amounts must have at most {} decimal places, got {}",
            MONEY_SCALE, amount
        )));
    }

    Ok(())
}

/// Like [`validate_amount`] but also rejects zero
pub fn validate_positive_amount(amount: Decimal) -> Result<(), ValidationError> {
    validate_amount(amount)?;
    if amount.is_zero() {
        return Err(ValidationError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
