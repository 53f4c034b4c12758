// Cash register ledger: every balance movement is paired with an entry, transfers
// move cash symmetrically, and replaying the ledger reproduces the stored balance.

#[path = "../helpers/mod.rs"]
mod helpers;

use fieldlend::core::{AppError, ValidationError};
use fieldlend::modules::lending::models::{RecordExpenseRequest, TransferCashRequest};
use fieldlend::modules::registers::models::{CashRegister, EntryCategory, EntryKind, RegisterStatus};
use helpers::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SOUTH_REGISTER_ID: &str = "register-south";

fn transfer(from: &str, to: &str, amount: Decimal) -> TransferCashRequest {
    TransferCashRequest {
        from_register_id: from.to_string(),
        to_register_id: to.to_string(),
        amount,
    }
}

async fn two_registers() -> fieldlend::MemoryStore {
    let store = seeded_store(dec!(1000)).await;
    store
        .seed(|s| {
            s.registers.insert(
                SOUTH_REGISTER_ID.to_string(),
                CashRegister::new(SOUTH_REGISTER_ID, "route-south", dec!(250)),
            );
        })
        .await;
    store
}

#[tokio::test]
async fn test_transfer_writes_paired_entries() {
    let store = two_registers().await;
    let service = service(store.clone());

    let entries = service
        .transfer_cash(AGENT_ID, transfer(REGISTER_ID, SOUTH_REGISTER_ID, dec!(300)))
        .await
        .expect("Failed to transfer cash");

    assert_eq!(entries.outgoing.kind, EntryKind::TransferOut);
    assert_eq!(entries.outgoing.category, EntryCategory::Expense);
    assert_eq!(entries.outgoing.balance_after, dec!(700));
    assert_eq!(entries.incoming.kind, EntryKind::TransferIn);
    assert_eq!(entries.incoming.category, EntryCategory::Income);
    assert_eq!(entries.incoming.balance_after, dec!(550));
    assert_eq!(entries.outgoing.amount, entries.incoming.amount);

    let state = store.snapshot().await;
    assert_eq!(state.registers[REGISTER_ID].current_balance, dec!(700));
    assert_eq!(state.registers[SOUTH_REGISTER_ID].current_balance, dec!(550));

    let total: Decimal = state.registers.values().map(|r| r.current_balance).sum();
    assert_eq!(total, dec!(1250));
}

#[tokio::test]
async fn test_transfer_rejections_leave_balances_untouched() {
    let store = two_registers().await;
    let service = service(store.clone());

    let err = service
        .transfer_cash(AGENT_ID, transfer(REGISTER_ID, REGISTER_ID, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::SameRegisterTransfer)
    ));

    let err = service
        .transfer_cash(AGENT_ID, transfer(SOUTH_REGISTER_ID, REGISTER_ID, dec!(251)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InsufficientBalance { .. })
    ));

    store
        .seed(|s| {
            if let Some(register) = s.registers.get_mut(SOUTH_REGISTER_ID) {
                register.status = RegisterStatus::Closed;
            }
        })
        .await;
    let err = service
        .transfer_cash(AGENT_ID, transfer(REGISTER_ID, SOUTH_REGISTER_ID, dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::RegisterClosed)
    ));

    let state = store.snapshot().await;
    assert!(state.entries.is_empty());
    assert_eq!(state.registers[REGISTER_ID].current_balance, dec!(1000));
    assert_eq!(state.registers[SOUTH_REGISTER_ID].current_balance, dec!(250));
}

#[tokio::test]
async fn test_ledger_replays_to_register_balance() {
    let store = two_registers().await;
    let service = service(store.clone());

    let credit_id = service
        .originate_credit(application(dec!(300)))
        .await
        .expect("Failed to originate credit")
        .credit
        .id;
    service
        .record_payment(&credit_id, AGENT_ID, payment(dec!(66)))
        .await
        .expect("Failed to record payment");
    service
        .record_expense(
            REGISTER_ID,
            AGENT_ID,
            RecordExpenseRequest {
                amount: dec!(12.50),
                description: "Motorbike fuel".to_string(),
            },
        )
        .await
        .expect("Failed to record expense");
    service
        .transfer_cash(AGENT_ID, transfer(SOUTH_REGISTER_ID, REGISTER_ID, dec!(100)))
        .await
        .expect("Failed to transfer cash");

    // 1000 - 300 + 66 - 12.50 + 100
    let report = service
        .verify_register(REGISTER_ID)
        .await
        .expect("Ledger must verify");
    assert_eq!(report.entry_count, 4);
    assert_eq!(report.current_balance, dec!(853.50));

    let state = store.snapshot().await;
    let north: Vec<_> = state
        .entries
        .iter()
        .filter(|e| e.register_id == REGISTER_ID)
        .cloned()
        .collect();
    assert_eq!(replayed_balance(&north, dec!(1000)), dec!(853.50));
    for pair in north.windows(2) {
        assert_eq!(pair[0].balance_after, pair[1].balance_before);
    }
    for entry in &north {
        assert!(entry.is_balanced());
    }

    let south = service
        .verify_register(SOUTH_REGISTER_ID)
        .await
        .expect("Ledger must verify");
    assert_eq!(south.entry_count, 1);
    assert_eq!(south.current_balance, dec!(150));
}

#[tokio::test]
async fn test_verify_detects_balance_moved_outside_ledger() {
    let store = two_registers().await;
    let service = service(store.clone());

    service
        .transfer_cash(AGENT_ID, transfer(REGISTER_ID, SOUTH_REGISTER_ID, dec!(50)))
        .await
        .expect("Failed to transfer cash");

    store
        .seed(|s| {
            if let Some(register) = s.registers.get_mut(REGISTER_ID) {
                register.current_balance += dec!(1);
            }
        })
        .await;

    let err = service.verify_register(REGISTER_ID).await.unwrap_err();
    assert!(matches!(err, AppError::Consistency(_)));

    service
        .verify_register(SOUTH_REGISTER_ID)
        .await
        .expect("Untouched register must verify");
}

#[tokio::test]
async fn test_shift_lifecycle_gates_expenses() {
    let store = two_registers().await;
    let service = service(store.clone());
    let expense = || RecordExpenseRequest {
        amount: dec!(20),
        description: "Phone credit".to_string(),
    };

    let err = service
        .record_expense(SOUTH_REGISTER_ID, AGENT_ID, expense())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NoActiveShift)
    ));

    let shift = service
        .open_shift(SOUTH_REGISTER_ID, AGENT_ID)
        .await
        .expect("Failed to open shift");
    let err = service
        .open_shift(SOUTH_REGISTER_ID, AGENT_ID)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::ShiftAlreadyOpen)
    ));

    let entry = service
        .record_expense(SOUTH_REGISTER_ID, AGENT_ID, expense())
        .await
        .expect("Failed to record expense");
    assert_eq!(entry.shift_id.as_deref(), Some(shift.id.as_str()));
    assert_eq!(entry.balance_after, dec!(230));

    let closed = service
        .close_shift(SOUTH_REGISTER_ID)
        .await
        .expect("Failed to close shift");
    assert!(closed.closed_at.is_some());

    let err = service.close_shift(SOUTH_REGISTER_ID).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NoActiveShift)
    ));

    // Transfers do not need a shift
    service
        .transfer_cash(AGENT_ID, transfer(SOUTH_REGISTER_ID, REGISTER_ID, dec!(30)))
        .await
        .expect("Failed to transfer cash");
}

#[tokio::test]
async fn test_opposite_transfers_run_concurrently() {
    let store = two_registers().await;
    let service = service(store.clone());

    let outbound = (0..5).map(|_| {
        service.transfer_cash(AGENT_ID, transfer(REGISTER_ID, SOUTH_REGISTER_ID, dec!(10)))
    });
    let inbound = (0..5).map(|_| {
        service.transfer_cash(AGENT_ID, transfer(SOUTH_REGISTER_ID, REGISTER_ID, dec!(20)))
    });
    let results = futures_util::future::join_all(outbound.chain(inbound)).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let state = store.snapshot().await;
    assert_eq!(state.registers[REGISTER_ID].current_balance, dec!(1050));
    assert_eq!(state.registers[SOUTH_REGISTER_ID].current_balance, dec!(200));
    assert_eq!(state.entries.len(), 20);

    for register in [REGISTER_ID, SOUTH_REGISTER_ID] {
        service
            .verify_register(register)
            .await
            .expect("Ledger must verify");
    }
}
