use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::core::error::Result;
use crate::modules::calendar::models::Calendar;
use crate::modules::clients::models::ClientRecord;
use crate::modules::credits::models::{Credit, Installment};
use crate::modules::payments::models::{Payment, PaymentAllocation};
use crate::modules::policies::models::RouteCreditPolicy;
use crate::modules::registers::models::{CashRegister, LedgerEntry, Shift};

/// Source of units of work. Every workflow runs inside exactly one.
#[async_trait]
pub trait LedgerStore: Send + Sync + 'static {
    type Uow: UnitOfWork;

    /// Start a unit of work. Fails with `Busy` when the store cannot be entered in time.
    async fn begin(&self) -> Result<Self::Uow>;
}

/// One serializable transaction over the ledger's durable state.
///
/// `lock_*` methods hold an exclusive row lock until `commit` or `rollback`.
/// Dropping an uncommitted unit of work discards all of its writes.
#[async_trait]
pub trait UnitOfWork: Send {
    // Configuration and directory lookups

    async fn find_route_policy(&mut self, route_id: &str) -> Result<Option<RouteCreditPolicy>>;

    async fn load_calendar(&mut self) -> Result<Calendar>;

    /// Locks the client so concurrent originations count active credits one at a time
    async fn lock_client(&mut self, client_id: &str) -> Result<Option<ClientRecord>>;

    // Registers, shifts and the ledger

    async fn lock_register(&mut self, register_id: &str) -> Result<Option<CashRegister>>;

    async fn lock_register_for_route(&mut self, route_id: &str) -> Result<Option<CashRegister>>;

    async fn update_register_balance(
        &mut self,
        register_id: &str,
        balance: Decimal,
        at: NaiveDateTime,
    ) -> Result<()>;

    async fn find_open_shift(&mut self, register_id: &str) -> Result<Option<Shift>>;

    async fn insert_shift(&mut self, shift: &Shift) -> Result<()>;

    async fn close_shift(&mut self, shift_id: &str, closed_at: NaiveDateTime) -> Result<()>;

    async fn append_ledger_entry(&mut self, entry: &LedgerEntry) -> Result<()>;

    /// Entries for a register in insertion order
    async fn list_ledger_entries(&mut self, register_id: &str) -> Result<Vec<LedgerEntry>>;

    // Credits and installments

    async fn count_unpaid_credits(&mut self, client_id: &str) -> Result<i64>;

    async fn insert_credit(&mut self, credit: &Credit) -> Result<()>;

    async fn find_credit(&mut self, credit_id: &str) -> Result<Option<Credit>>;

    async fn lock_credit(&mut self, credit_id: &str) -> Result<Option<Credit>>;

    async fn update_credit_balance(&mut self, credit: &Credit) -> Result<()>;

    async fn insert_installments(&mut self, installments: &[Installment]) -> Result<()>;

    /// Installments ordered by due date, then number
    async fn list_installments(&mut self, credit_id: &str) -> Result<Vec<Installment>>;

    /// Same order as [`UnitOfWork::list_installments`], rows locked
    async fn lock_installments(&mut self, credit_id: &str) -> Result<Vec<Installment>>;

    async fn update_installment(&mut self, installment: &Installment) -> Result<()>;

    // Payments

    async fn insert_payment(&mut self, payment: &Payment) -> Result<()>;

    async fn insert_allocation(&mut self, allocation: &PaymentAllocation) -> Result<()>;

    async fn list_allocations_for_credit(&mut self, credit_id: &str)
        -> Result<Vec<PaymentAllocation>>;

    // Boundary

    async fn commit(self) -> Result<()>;

    async fn rollback(self) -> Result<()>;
}
