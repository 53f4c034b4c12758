// Property-based tests for the payment waterfall: every cent of a payment within the
// outstanding balance lands on some installment, oldest first.

#[path = "../helpers/mod.rs"]
mod helpers;

use fieldlend::modules::credits::services::InstallmentScheduler;
use fieldlend::modules::payments::services::PaymentAllocationEngine;
use helpers::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_partial_payment_splits_capital_and_interest() {
    let mut installments = weekly_installments("credit-1", &[dec!(110); 5]);

    let outcome =
        PaymentAllocationEngine::allocate(dec!(165), &mut installments, dec!(500), dec!(50), 5, now())
            .expect("Failed to allocate payment");

    assert_eq!(outcome.allocations.len(), 2);
    assert_eq!(outcome.remainder, Decimal::ZERO);

    let full = &outcome.allocations[0];
    assert_eq!(full.amount_applied, dec!(110));
    assert_eq!(full.capital_portion, dec!(100.00));
    assert_eq!(full.interest_portion, dec!(10.00));
    assert!(full.settles_installment);

    let half = &outcome.allocations[1];
    assert_eq!(half.amount_applied, dec!(55));
    assert_eq!(half.capital_portion, dec!(50.00));
    assert_eq!(half.interest_portion, dec!(5.00));
    assert!(!half.settles_installment);

    assert!(installments[0].is_paid());
    assert_eq!(installments[1].paid_amount, dec!(55));
    assert_eq!(installments[2].paid_amount, Decimal::ZERO);
}

#[test]
fn test_overpayment_reports_remainder() {
    let mut installments = weekly_installments("credit-1", &[dec!(50), dec!(50)]);

    let outcome =
        PaymentAllocationEngine::allocate(dec!(130), &mut installments, dec!(90), dec!(10), 2, now())
            .expect("Failed to allocate payment");

    assert_eq!(outcome.total_applied(), dec!(100));
    assert_eq!(outcome.remainder, dec!(30));
}

proptest! {
    #[test]
    fn prop_payments_are_fully_allocated(
        total_cents in 10_000i64..=1_000_000,
        count in 1usize..=30,
        payment_weights in prop::collection::vec(1u32..=100, 1..6),
    ) {
        let total = Decimal::new(total_cents, 2);
        let amounts = InstallmentScheduler::split_amounts(total, count).unwrap();
        let mut installments = weekly_installments("credit-1", &amounts);
        let interest = dec!(0.1) * total;

        // Carve the total debt into successive payments proportional to the weights
        let weight_sum: u32 = payment_weights.iter().sum();
        let mut outstanding = total;
        let mut collected = Decimal::ZERO;

        // Portions use flat shares of total / count, so they drift from the applied
        // amounts by at most the last installment's rounding slack plus a cent per row
        let last_drift = (amounts[count - 1] - total / Decimal::from(count)).abs();
        let mut split_sum = Decimal::ZERO;
        let mut applied_sum = Decimal::ZERO;
        let mut allocation_count = 0u32;

        for weight in payment_weights {
            let share = (total * Decimal::from(weight) / Decimal::from(weight_sum)).round_dp(2);
            let amount = share.min(outstanding);
            if amount <= Decimal::ZERO {
                continue;
            }

            let outcome = PaymentAllocationEngine::allocate(
                amount,
                &mut installments,
                total - interest,
                interest,
                count,
                now(),
            )
            .unwrap();

            prop_assert_eq!(outcome.remainder, Decimal::ZERO);
            prop_assert_eq!(outcome.total_applied(), amount);

            for allocation in &outcome.allocations {
                split_sum += allocation.capital_portion + allocation.interest_portion;
                applied_sum += allocation.amount_applied;
                allocation_count += 1;
            }
            let tolerance = dec!(0.01) * Decimal::from(allocation_count) + last_drift;
            prop_assert!(
                (split_sum - applied_sum).abs() <= tolerance,
                "portions {} drifted from applied {} beyond {}",
                split_sum,
                applied_sum,
                tolerance
            );

            outstanding -= amount;
            collected += amount;
        }

        let paid: Decimal = installments.iter().map(|i| i.paid_amount).sum();
        prop_assert_eq!(paid, collected);

        // Paid installments form a prefix of the schedule
        let first_unpaid = installments.iter().position(|i| !i.is_paid());
        if let Some(index) = first_unpaid {
            for installment in &installments[index + 1..] {
                prop_assert_eq!(installment.paid_amount, Decimal::ZERO);
            }
        }

        for installment in &installments {
            prop_assert!(installment.paid_amount <= installment.amount);
        }
    }
}
