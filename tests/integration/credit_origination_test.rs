// Credit origination end to end through the service and the in-process store.

#[path = "../helpers/mod.rs"]
mod helpers;

use fieldlend::core::{AppError, ConfigurationError, ValidationError};
use fieldlend::modules::credits::models::CreditStatus;
use fieldlend::modules::registers::models::{EntryCategory, EntryKind};
use helpers::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_originate_disburses_and_schedules() {
    let store = seeded_store(dec!(2000)).await;
    let service = service(store.clone());

    let receipt = service
        .originate_credit(application(dec!(500)))
        .await
        .expect("Failed to originate credit");

    assert_eq!(receipt.credit.principal, dec!(500));
    assert_eq!(receipt.credit.interest_amount, dec!(50));
    assert_eq!(receipt.credit.total_debt, dec!(550));
    assert_eq!(receipt.credit.balance, dec!(550));
    assert_eq!(receipt.credit.status, CreditStatus::Unpaid);
    assert_eq!(receipt.credit.user_id, AGENT_ID);
    assert_eq!(receipt.installments.len(), 5);
    assert!(receipt.installments.iter().all(|i| i.amount == dec!(110)));

    assert_eq!(receipt.disbursement.kind, EntryKind::Disbursement);
    assert_eq!(receipt.disbursement.category, EntryCategory::Expense);
    assert_eq!(receipt.disbursement.balance_before, dec!(2000));
    assert_eq!(receipt.disbursement.balance_after, dec!(1500));
    assert_eq!(
        receipt.disbursement.credit_id.as_deref(),
        Some(receipt.credit.id.as_str())
    );
    assert_eq!(
        receipt.disbursement.description,
        "Credit disbursement - client Ana Ruiz"
    );

    let state = store.snapshot().await;
    assert_eq!(state.registers[REGISTER_ID].current_balance, dec!(1500));
    assert_eq!(state.credits.len(), 1);
    assert_eq!(state.installments.len(), 5);
    assert_eq!(state.entries.len(), 1);

    let scheduled: Decimal = state.installments.iter().map(|i| i.amount).sum();
    assert_eq!(scheduled, receipt.credit.total_debt);
}

#[tokio::test]
async fn test_insufficient_register_balance_writes_nothing() {
    let store = seeded_store(dec!(400)).await;
    let service = service(store.clone());

    let err = service
        .originate_credit(application(dec!(500)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InsufficientRegisterBalance { .. })
    ));

    let state = store.snapshot().await;
    assert_eq!(state.registers[REGISTER_ID].current_balance, dec!(400));
    assert!(state.credits.is_empty());
    assert!(state.installments.is_empty());
    assert!(state.entries.is_empty());
}

#[tokio::test]
async fn test_failed_ledger_append_rolls_back_origination() {
    let store = seeded_store(dec!(2000)).await;
    let service = service(store.clone());

    store.fail_next_ledger_append();
    let err = service
        .originate_credit(application(dec!(500)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    let state = store.snapshot().await;
    assert_eq!(state.registers[REGISTER_ID].current_balance, dec!(2000));
    assert!(state.credits.is_empty());
    assert!(state.installments.is_empty());
    assert!(state.entries.is_empty());

    // The store is usable again afterwards
    service
        .originate_credit(application(dec!(500)))
        .await
        .expect("Failed to originate credit after rollback");
}

#[tokio::test]
async fn test_active_credit_limit() {
    let store = seeded_store(dec!(5000)).await;
    let service = service(store.clone());

    for _ in 0..2 {
        service
            .originate_credit(application(dec!(200)))
            .await
            .expect("Failed to originate credit");
    }

    let err = service
        .originate_credit(application(dec!(200)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::ActiveCreditLimitReached { limit: 2 })
    ));
    assert_eq!(store.snapshot().await.credits.len(), 2);
}

#[tokio::test]
async fn test_rules_fail_with_their_own_reason() {
    let store = seeded_store(dec!(2000)).await;
    let service = service(store.clone());

    let err = service
        .originate_credit(application(dec!(50)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Amount must be between 100 and 1000");

    let mut long_term = application(dec!(500));
    long_term.term_days = 90;
    let err = service.originate_credit(long_term).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::TermOutOfRange { min: 5, max: 60 })
    ));

    let mut monthly = application(dec!(500));
    monthly.frequency = "monthly".to_string();
    let err = service.originate_credit(monthly).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::FrequencyNotAllowed(ref f)) if f == "monthly"
    ));

    let mut other_route = application(dec!(500));
    other_route.route_id = "route-south".to_string();
    let err = service.originate_credit(other_route).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Configuration(ConfigurationError::NoPolicyForRoute { .. })
    ));

    assert!(store.snapshot().await.entries.is_empty());
}

#[tokio::test]
async fn test_unverified_client_and_missing_shift() {
    let store = seeded_store(dec!(2000)).await;
    let service = service(store.clone());

    store
        .seed(|s| {
            if let Some(client) = s.clients.get_mut(CLIENT_ID) {
                client.verified = false;
            }
        })
        .await;
    let err = service
        .originate_credit(application(dec!(500)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidClient)
    ));

    store
        .seed(|s| {
            if let Some(client) = s.clients.get_mut(CLIENT_ID) {
                client.verified = true;
            }
            s.shifts.clear();
        })
        .await;
    let err = service
        .originate_credit(application(dec!(500)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NoActiveShift)
    ));
}

#[tokio::test]
async fn test_concurrent_originations_respect_register_balance() {
    // Room for exactly two 400 disbursements
    let store = seeded_store(dec!(900)).await;
    store
        .seed(|s| {
            if let Some(policy) = s.policies.get_mut(ROUTE_ID) {
                policy.max_active_credits_per_client = 10;
            }
        })
        .await;
    let service = service(store.clone());

    let attempts = (0..4).map(|_| service.originate_credit(application(dec!(400))));
    let results = futures_util::future::join_all(attempts).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 2);
    for err in results.into_iter().filter_map(|r| r.err()) {
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InsufficientRegisterBalance { .. })
        ));
    }

    let state = store.snapshot().await;
    assert_eq!(state.registers[REGISTER_ID].current_balance, dec!(100));
    assert_eq!(state.entries.len(), 2);
}
