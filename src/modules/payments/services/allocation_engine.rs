use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::core::{money, AppError, Result};
use crate::modules::credits::models::Installment;
use crate::modules::payments::models::PlannedAllocation;

/// Result of distributing one payment
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    pub allocations: Vec<PlannedAllocation>,
    /// Amount left after every installment was settled. Zero for any payment within balance.
    pub remainder: Decimal,
}

impl AllocationOutcome {
    pub fn total_applied(&self) -> Decimal {
        self.allocations.iter().map(|a| a.amount_applied).sum()
    }
}

/// Waterfall distribution of a payment over a credit's installments
pub struct PaymentAllocationEngine;

impl PaymentAllocationEngine {
    /// Apply `amount` to `installments` oldest-due first, updating them in place.
    ///
    /// `installments` must already be in due-date order. The capital and interest split uses
    /// the credit's flat per-installment shares (`total / installment_count`) scaled by the
    /// fraction of the installment being covered, not the installment's own amount.
    pub fn allocate(
        amount: Decimal,
        installments: &mut [Installment],
        total_principal: Decimal,
        total_interest: Decimal,
        installment_count: usize,
        at: NaiveDateTime,
    ) -> Result<AllocationOutcome> {
        if installment_count == 0 {
            return Err(AppError::internal("Credit has no installments to allocate against"));
        }

        let count = Decimal::from(installment_count);
        let capital_share = total_principal / count;
        let interest_share = total_interest / count;

        let mut remaining = amount;
        let mut allocations = Vec::new();

        for installment in installments.iter_mut() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let gap = installment.outstanding();
            if gap <= Decimal::ZERO || installment.amount.is_zero() {
                continue;
            }

            let applied = money::round2(gap.min(remaining));
            let fraction = applied / installment.amount;
            let settles_installment = installment.apply(applied, at)?;

            allocations.push(PlannedAllocation {
                installment_id: installment.id.clone(),
                amount_applied: applied,
                capital_portion: money::round2(capital_share * fraction),
                interest_portion: money::round2(interest_share * fraction),
                settles_installment,
            });

            remaining -= applied;
        }

        Ok(AllocationOutcome {
            allocations,
            remainder: remaining.max(Decimal::ZERO),
        })
    }
}
