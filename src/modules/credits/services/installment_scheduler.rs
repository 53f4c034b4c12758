use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::core::{money, AppError, Result, ValidationError};
use crate::modules::calendar::models::Calendar;
use crate::modules::credits::models::interest_for;
use crate::modules::policies::models::Frequency;

/// One row of a generated schedule, before it is tied to a credit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledInstallment {
    pub installment_number: i32,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// Builds the full installment schedule for a credit
pub struct InstallmentScheduler;

impl InstallmentScheduler {
    /// Split `principal + interest` into equal installments due every frequency interval
    /// after `start`, skipping non-business days.
    ///
    /// Every installment carries `round2(total_debt / count)` except the last, which takes
    /// whatever remains so the schedule sums to the total debt exactly. Due dates are
    /// cumulative: a date pushed past a holiday moves every later date with it.
    pub fn generate_schedule(
        principal: Decimal,
        interest_rate_percent: Decimal,
        term_days: i32,
        frequency: Frequency,
        calendar: &Calendar,
        start: NaiveDate,
    ) -> Result<Vec<ScheduledInstallment>> {
        if term_days <= 0 {
            return Err(ValidationError::InvalidTerm(term_days).into());
        }

        let total_debt = principal + interest_for(principal, interest_rate_percent);
        let count = frequency.installment_count(term_days);
        let amounts = Self::split_amounts(total_debt, count)?;
        let due_dates = Self::due_dates(frequency, count, calendar, start)?;

        debug!(
            total_debt = %total_debt,
            count = count,
            frequency = %frequency,
            "Generated installment schedule"
        );

        Ok(amounts
            .into_iter()
            .zip(due_dates)
            .enumerate()
            .map(|(i, (amount, due_date))| ScheduledInstallment {
                installment_number: (i + 1) as i32,
                amount,
                due_date,
            })
            .collect())
    }

    /// Equal shares rounded to cents; the last share absorbs the rounding difference
    pub fn split_amounts(total_debt: Decimal, count: usize) -> Result<Vec<Decimal>> {
        if count == 0 {
            return Err(AppError::internal("Installment count cannot be zero"));
        }

        let base = money::round2(total_debt / Decimal::from(count));
        let last = total_debt - base * Decimal::from(count - 1);

        if base <= Decimal::ZERO || last <= Decimal::ZERO {
            return Err(ValidationError::InstallmentAmountTooSmall { total_debt, count }.into());
        }

        let mut amounts = vec![base; count - 1];
        amounts.push(last);
        Ok(amounts)
    }

    fn due_dates(
        frequency: Frequency,
        count: usize,
        calendar: &Calendar,
        start: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let step = Days::new(frequency.interval_days() as u64);
        let mut cursor = start;
        let mut dates = Vec::with_capacity(count);

        for _ in 0..count {
            let nominal = cursor
                .checked_add_days(step)
                .ok_or_else(|| AppError::internal("Failed to calculate installment due date"))?;
            cursor = calendar.roll_forward(nominal);
            dates.push(cursor);
        }

        Ok(dates)
    }
}
