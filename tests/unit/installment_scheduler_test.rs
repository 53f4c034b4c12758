// Property-based tests for schedule generation: amounts always sum to the total debt
// and due dates never land on a non-business day.

#[path = "../helpers/mod.rs"]
mod helpers;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use fieldlend::modules::calendar::models::Calendar;
use fieldlend::modules::credits::models::interest_for;
use fieldlend::modules::credits::services::InstallmentScheduler;
use fieldlend::modules::policies::models::Frequency;
use helpers::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn frequency_strategy() -> impl Strategy<Value = Frequency> {
    prop::sample::select(vec![
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
    ])
}

/// 2025-12-25 and 2026-01-01 excluded, Sundays off
fn holiday_calendar() -> Calendar {
    Calendar::new(
        [
            NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        ],
        false,
        true,
    )
}

#[test]
fn test_documented_weekly_schedule() {
    let schedule = InstallmentScheduler::generate_schedule(
        dec!(500),
        dec!(10),
        30,
        Frequency::Weekly,
        &Calendar::new([], false, true),
        disbursement_day(),
    )
    .expect("Failed to generate schedule");

    let amounts: Vec<Decimal> = schedule.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![dec!(110.00); 5]);

    let dates: Vec<NaiveDate> = schedule.iter().map(|s| s.due_date).collect();
    let expected: Vec<NaiveDate> = [(11, 10), (11, 17), (11, 24), (12, 1), (12, 8)]
        .iter()
        .map(|(m, d)| NaiveDate::from_ymd_opt(2025, *m, *d).unwrap())
        .collect();
    assert_eq!(dates, expected);

    let numbers: Vec<i32> = schedule.iter().map(|s| s.installment_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_holiday_pushes_later_dates() {
    // Thursday start, weekly: 12-25 is a holiday, so the third due date moves to 12-26
    // and every later date follows it
    let start = NaiveDate::from_ymd_opt(2025, 12, 11).unwrap();
    let schedule = InstallmentScheduler::generate_schedule(
        dec!(300),
        dec!(0),
        21,
        Frequency::Weekly,
        &holiday_calendar(),
        start,
    )
    .expect("Failed to generate schedule");

    let dates: Vec<NaiveDate> = schedule.iter().map(|s| s.due_date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 12, 18).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 26).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
        ]
    );
}

#[test]
fn test_last_installment_absorbs_rounding() {
    let schedule = InstallmentScheduler::generate_schedule(
        dec!(100),
        dec!(0),
        3,
        Frequency::Daily,
        &Calendar::default(),
        disbursement_day(),
    )
    .expect("Failed to generate schedule");

    let amounts: Vec<Decimal> = schedule.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
}

proptest! {
    #[test]
    fn prop_schedule_sums_to_total_debt(
        principal_cents in 10_000i64..=10_000_000,
        rate_percent in 0i64..=50,
        term_days in 1i32..=120,
        frequency in frequency_strategy(),
    ) {
        let principal = Decimal::new(principal_cents, 2);
        let rate = Decimal::from(rate_percent);

        let schedule = InstallmentScheduler::generate_schedule(
            principal,
            rate,
            term_days,
            frequency,
            &holiday_calendar(),
            disbursement_day(),
        )
        .unwrap();

        let total: Decimal = schedule.iter().map(|s| s.amount).sum();
        prop_assert_eq!(total, principal + interest_for(principal, rate));
        prop_assert_eq!(schedule.len(), frequency.installment_count(term_days));

        for installment in &schedule {
            prop_assert!(installment.amount > Decimal::ZERO);
            prop_assert!(installment.amount.scale() <= 2);
        }

        // All but the last carry the same amount
        let first = schedule[0].amount;
        for installment in &schedule[..schedule.len() - 1] {
            prop_assert_eq!(installment.amount, first);
        }
    }

    #[test]
    fn prop_due_dates_skip_non_business_days(
        term_days in 1i32..=120,
        frequency in frequency_strategy(),
        start_offset in 0u64..60,
    ) {
        let calendar = holiday_calendar();
        let start = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap() + Days::new(start_offset);

        let schedule = InstallmentScheduler::generate_schedule(
            dec!(1000),
            dec!(10),
            term_days,
            frequency,
            &calendar,
            start,
        )
        .unwrap();

        let mut previous = start;
        for installment in &schedule {
            prop_assert!(!calendar.is_non_business_day(installment.due_date));
            prop_assert!(installment.due_date.weekday() != Weekday::Sun);
            prop_assert!(
                installment.due_date >= previous + Days::new(frequency.interval_days() as u64)
            );
            previous = installment.due_date;
        }
    }
}
