use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};
use tracing::info;

use crate::core::{AppError, LedgerStore, Result, UnitOfWork};
use crate::modules::calendar::models::Calendar;
use crate::modules::calendar::repositories::CalendarRepository;
use crate::modules::clients::models::ClientRecord;
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::credits::models::{Credit, Installment};
use crate::modules::credits::repositories::{CreditRepository, InstallmentRepository};
use crate::modules::payments::models::{Payment, PaymentAllocation};
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::policies::models::RouteCreditPolicy;
use crate::modules::policies::repositories::PolicyRepository;
use crate::modules::registers::models::{CashRegister, LedgerEntry, Shift};
use crate::modules::registers::repositories::RegisterRepository;

/// Ledger store backed by a MySQL pool. Each unit of work is one InnoDB transaction.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    lock_wait_timeout_secs: u64,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool, lock_wait_timeout_secs: u64) -> Self {
        Self {
            pool,
            lock_wait_timeout_secs,
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Apply the schema in `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to run migrations: {}", e)))?;

        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MySqlStore {
    type Uow = MySqlUnitOfWork;

    async fn begin(&self) -> Result<MySqlUnitOfWork> {
        let mut tx = self.pool.begin().await?;

        // Row locks wait at most this long before the statement fails with 1205 (Busy)
        sqlx::query("SET SESSION innodb_lock_wait_timeout = ?")
            .bind(self.lock_wait_timeout_secs)
            .execute(&mut *tx)
            .await?;

        Ok(MySqlUnitOfWork { tx })
    }
}

/// Unit of work over one MySQL transaction. Dropped without commit, it rolls back.
pub struct MySqlUnitOfWork {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    async fn find_route_policy(&mut self, route_id: &str) -> Result<Option<RouteCreditPolicy>> {
        PolicyRepository::find_active_by_route(&mut self.tx, route_id).await
    }

    async fn load_calendar(&mut self) -> Result<Calendar> {
        CalendarRepository::load(&mut self.tx).await
    }

    async fn lock_client(&mut self, client_id: &str) -> Result<Option<ClientRecord>> {
        ClientRepository::lock_by_id(&mut self.tx, client_id).await
    }

    async fn lock_register(&mut self, register_id: &str) -> Result<Option<CashRegister>> {
        RegisterRepository::lock_by_id(&mut self.tx, register_id).await
    }

    async fn lock_register_for_route(&mut self, route_id: &str) -> Result<Option<CashRegister>> {
        RegisterRepository::lock_by_route(&mut self.tx, route_id).await
    }

    async fn update_register_balance(
        &mut self,
        register_id: &str,
        balance: Decimal,
        at: NaiveDateTime,
    ) -> Result<()> {
        RegisterRepository::update_balance(&mut self.tx, register_id, balance, at).await
    }

    async fn find_open_shift(&mut self, register_id: &str) -> Result<Option<Shift>> {
        RegisterRepository::find_open_shift(&mut self.tx, register_id).await
    }

    async fn insert_shift(&mut self, shift: &Shift) -> Result<()> {
        RegisterRepository::insert_shift(&mut self.tx, shift).await
    }

    async fn close_shift(&mut self, shift_id: &str, closed_at: NaiveDateTime) -> Result<()> {
        RegisterRepository::close_shift(&mut self.tx, shift_id, closed_at).await
    }

    async fn append_ledger_entry(&mut self, entry: &LedgerEntry) -> Result<()> {
        RegisterRepository::insert_entry(&mut self.tx, entry).await
    }

    async fn list_ledger_entries(&mut self, register_id: &str) -> Result<Vec<LedgerEntry>> {
        RegisterRepository::find_entries(&mut self.tx, register_id).await
    }

    async fn count_unpaid_credits(&mut self, client_id: &str) -> Result<i64> {
        CreditRepository::count_unpaid_by_client(&mut self.tx, client_id).await
    }

    async fn insert_credit(&mut self, credit: &Credit) -> Result<()> {
        CreditRepository::insert(&mut self.tx, credit).await
    }

    async fn find_credit(&mut self, credit_id: &str) -> Result<Option<Credit>> {
        CreditRepository::find_by_id(&mut self.tx, credit_id).await
    }

    async fn lock_credit(&mut self, credit_id: &str) -> Result<Option<Credit>> {
        CreditRepository::lock_by_id(&mut self.tx, credit_id).await
    }

    async fn update_credit_balance(&mut self, credit: &Credit) -> Result<()> {
        CreditRepository::update_balance(&mut self.tx, credit).await
    }

    async fn insert_installments(&mut self, installments: &[Installment]) -> Result<()> {
        InstallmentRepository::insert_batch(&mut self.tx, installments).await
    }

    async fn list_installments(&mut self, credit_id: &str) -> Result<Vec<Installment>> {
        InstallmentRepository::find_by_credit(&mut self.tx, credit_id).await
    }

    async fn lock_installments(&mut self, credit_id: &str) -> Result<Vec<Installment>> {
        InstallmentRepository::lock_by_credit(&mut self.tx, credit_id).await
    }

    async fn update_installment(&mut self, installment: &Installment) -> Result<()> {
        InstallmentRepository::update_payment_state(&mut self.tx, installment).await
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<()> {
        PaymentRepository::insert(&mut self.tx, payment).await
    }

    async fn insert_allocation(&mut self, allocation: &PaymentAllocation) -> Result<()> {
        PaymentRepository::insert_allocation(&mut self.tx, allocation).await
    }

    async fn list_allocations_for_credit(
        &mut self,
        credit_id: &str,
    ) -> Result<Vec<PaymentAllocation>> {
        PaymentRepository::find_allocations_by_credit(&mut self.tx, credit_id).await
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
