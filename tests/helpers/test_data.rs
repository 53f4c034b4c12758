// Test data factory
//
// Seeds a MemoryStore with a single route: one policy, one cash register, one
// verified client and an open shift. Individual tests override what they need.

use chrono::{Days, NaiveDate, NaiveDateTime};
use fieldlend::core::BusinessClock;
use fieldlend::modules::clients::models::ClientRecord;
use fieldlend::modules::credits::models::{CreditApplication, Installment};
use fieldlend::modules::lending::models::RecordPaymentRequest;
use fieldlend::modules::policies::models::{Frequency, LendingSettings, RouteCreditPolicy};
use fieldlend::modules::registers::models::{CashRegister, Shift};
use fieldlend::{LoanLedgerService, MemoryStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const ROUTE_ID: &str = "route-north";
pub const REGISTER_ID: &str = "register-north";
pub const CLIENT_ID: &str = "client-ana";
pub const AGENT_ID: &str = "agent-7";
pub const PRODUCT_ID: &str = "product-basic";

/// Monday, so weekly due dates land on Mondays
pub fn disbursement_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
}

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// amounts 100..=1000, terms 5..=60 days, 10% flat interest, weekly or daily
pub fn route_policy() -> RouteCreditPolicy {
    RouteCreditPolicy {
        route_id: ROUTE_ID.to_string(),
        amount_min: dec!(100),
        amount_max: dec!(1000),
        term_min: 5,
        term_max: 60,
        allowed_frequencies: [Frequency::Daily, Frequency::Weekly].into_iter().collect(),
        interest_rate_percent: dec!(10),
        max_active_credits_per_client: 2,
    }
}

pub fn application(amount: Decimal) -> CreditApplication {
    CreditApplication {
        client_id: CLIENT_ID.to_string(),
        route_id: ROUTE_ID.to_string(),
        product_id: PRODUCT_ID.to_string(),
        user_id: AGENT_ID.to_string(),
        amount,
        term_days: 30,
        frequency: "weekly".to_string(),
    }
}

pub fn payment(amount: Decimal) -> RecordPaymentRequest {
    RecordPaymentRequest {
        amount,
        method: "cash".to_string(),
        location: None,
    }
}

/// A store seeded with one fully operational route
pub async fn seeded_store(register_balance: Decimal) -> MemoryStore {
    let store = MemoryStore::new();
    store
        .seed(|s| {
            s.policies.insert(ROUTE_ID.to_string(), route_policy());
            s.registers.insert(
                REGISTER_ID.to_string(),
                CashRegister::new(REGISTER_ID, ROUTE_ID, register_balance),
            );
            s.clients.insert(
                CLIENT_ID.to_string(),
                ClientRecord::new(CLIENT_ID, "Ana Ruiz", ROUTE_ID, true),
            );
            s.shifts.push(Shift::open(
                REGISTER_ID.to_string(),
                AGENT_ID.to_string(),
                now(),
            ));
        })
        .await;
    store
}

pub fn service(store: MemoryStore) -> LoanLedgerService<MemoryStore> {
    service_with_settings(store, LendingSettings::default())
}

pub fn service_with_settings(
    store: MemoryStore,
    settings: LendingSettings,
) -> LoanLedgerService<MemoryStore> {
    LoanLedgerService::new(store, settings, BusinessClock::pinned(disbursement_day()))
}

/// Weekly installments of the given amounts, due one week apart
pub fn weekly_installments(credit_id: &str, amounts: &[Decimal]) -> Vec<Installment> {
    let first_due = disbursement_day() + Days::new(7);
    amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            Installment::new(
                credit_id.to_string(),
                (i + 1) as i32,
                *amount,
                first_due + Days::new(7 * i as u64),
                now(),
            )
            .unwrap()
        })
        .collect()
}

/// Sum of every balance movement recorded for a register
pub fn replayed_balance(
    entries: &[fieldlend::modules::registers::models::LedgerEntry],
    opening: Decimal,
) -> Decimal {
    entries.iter().fold(opening, |balance, entry| {
        balance + (entry.balance_after - entry.balance_before)
    })
}
