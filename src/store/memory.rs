use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

use crate::core::{AppError, LedgerStore, Result, UnitOfWork};
use crate::modules::calendar::models::Calendar;
use crate::modules::clients::models::ClientRecord;
use crate::modules::credits::models::{Credit, CreditStatus, Installment};
use crate::modules::payments::models::{Payment, PaymentAllocation};
use crate::modules::policies::models::RouteCreditPolicy;
use crate::modules::registers::models::{CashRegister, LedgerEntry, Shift};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Whole durable state of the in-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub policies: HashMap<String, RouteCreditPolicy>,
    pub calendar: Calendar,
    pub clients: HashMap<String, ClientRecord>,
    pub registers: HashMap<String, CashRegister>,
    pub shifts: Vec<Shift>,
    pub entries: Vec<LedgerEntry>,
    pub credits: HashMap<String, Credit>,
    pub installments: Vec<Installment>,
    pub payments: Vec<Payment>,
    pub allocations: Vec<PaymentAllocation>,
}

/// In-process ledger store.
///
/// A unit of work holds the single state lock for its whole lifetime and works on a
/// private copy, so units of work are serializable. Commit swaps the copy in; dropping
/// the unit of work throws it away.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    lock_timeout: Duration,
    fail_next_append: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            lock_timeout,
            fail_next_append: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mutate the committed state directly
    pub async fn seed<F>(&self, f: F)
    where
        F: FnOnce(&mut MemoryState),
    {
        let mut state = self.state.lock().await;
        f(&mut state);
    }

    /// Copy of the committed state
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    /// Make the next ledger append fail, as a lost connection would
    pub fn fail_next_ledger_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    type Uow = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork> {
        let guard = tokio::time::timeout(self.lock_timeout, self.state.clone().lock_owned())
            .await
            .map_err(|_| {
                warn!(
                    timeout_ms = self.lock_timeout.as_millis() as u64,
                    "Store lock wait timed out"
                );
                AppError::Busy
            })?;

        let working = (*guard).clone();
        Ok(MemoryUnitOfWork {
            guard,
            working,
            fail_next_append: self.fail_next_append.clone(),
        })
    }
}

/// Unit of work over a [`MemoryStore`]
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_next_append: Arc<AtomicBool>,
}

impl MemoryUnitOfWork {
    fn sorted_installments(&self, credit_id: &str) -> Vec<Installment> {
        let mut installments: Vec<Installment> = self
            .working
            .installments
            .iter()
            .filter(|i| i.credit_id == credit_id)
            .cloned()
            .collect();
        installments.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.installment_number.cmp(&b.installment_number))
        });
        installments
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_route_policy(&mut self, route_id: &str) -> Result<Option<RouteCreditPolicy>> {
        Ok(self.working.policies.get(route_id).cloned())
    }

    async fn load_calendar(&mut self) -> Result<Calendar> {
        Ok(self.working.calendar.clone())
    }

    async fn lock_client(&mut self, client_id: &str) -> Result<Option<ClientRecord>> {
        Ok(self.working.clients.get(client_id).cloned())
    }

    async fn lock_register(&mut self, register_id: &str) -> Result<Option<CashRegister>> {
        Ok(self.working.registers.get(register_id).cloned())
    }

    async fn lock_register_for_route(&mut self, route_id: &str) -> Result<Option<CashRegister>> {
        let mut matching: Vec<&CashRegister> = self
            .working
            .registers
            .values()
            .filter(|r| r.route_id == route_id)
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matching.first().map(|r| (*r).clone()))
    }

    async fn update_register_balance(
        &mut self,
        register_id: &str,
        balance: Decimal,
        at: NaiveDateTime,
    ) -> Result<()> {
        let register = self
            .working
            .registers
            .get_mut(register_id)
            .ok_or_else(|| AppError::not_found("Cash register not found"))?;
        register.current_balance = balance;
        register.updated_at = at;
        Ok(())
    }

    async fn find_open_shift(&mut self, register_id: &str) -> Result<Option<Shift>> {
        Ok(self
            .working
            .shifts
            .iter()
            .rev()
            .find(|s| s.register_id == register_id && s.is_open())
            .cloned())
    }

    async fn insert_shift(&mut self, shift: &Shift) -> Result<()> {
        self.working.shifts.push(shift.clone());
        Ok(())
    }

    async fn close_shift(&mut self, shift_id: &str, closed_at: NaiveDateTime) -> Result<()> {
        let shift = self
            .working
            .shifts
            .iter_mut()
            .find(|s| s.id == shift_id && s.is_open())
            .ok_or_else(|| AppError::not_found("Open shift not found"))?;
        shift.closed_at = Some(closed_at);
        Ok(())
    }

    async fn append_ledger_entry(&mut self, entry: &LedgerEntry) -> Result<()> {
        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err(AppError::internal("Injected ledger append failure"));
        }
        self.working.entries.push(entry.clone());
        Ok(())
    }

    async fn list_ledger_entries(&mut self, register_id: &str) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .working
            .entries
            .iter()
            .filter(|e| e.register_id == register_id)
            .cloned()
            .collect())
    }

    async fn count_unpaid_credits(&mut self, client_id: &str) -> Result<i64> {
        Ok(self
            .working
            .credits
            .values()
            .filter(|c| c.client_id == client_id && c.status == CreditStatus::Unpaid)
            .count() as i64)
    }

    async fn insert_credit(&mut self, credit: &Credit) -> Result<()> {
        self.working
            .credits
            .insert(credit.id.clone(), credit.clone());
        Ok(())
    }

    async fn find_credit(&mut self, credit_id: &str) -> Result<Option<Credit>> {
        Ok(self.working.credits.get(credit_id).cloned())
    }

    async fn lock_credit(&mut self, credit_id: &str) -> Result<Option<Credit>> {
        Ok(self.working.credits.get(credit_id).cloned())
    }

    async fn update_credit_balance(&mut self, credit: &Credit) -> Result<()> {
        let stored = self
            .working
            .credits
            .get_mut(&credit.id)
            .ok_or_else(|| AppError::not_found("Credit not found"))?;
        stored.balance = credit.balance;
        stored.status = credit.status;
        stored.updated_at = credit.updated_at;
        Ok(())
    }

    async fn insert_installments(&mut self, installments: &[Installment]) -> Result<()> {
        self.working.installments.extend_from_slice(installments);
        Ok(())
    }

    async fn list_installments(&mut self, credit_id: &str) -> Result<Vec<Installment>> {
        Ok(self.sorted_installments(credit_id))
    }

    async fn lock_installments(&mut self, credit_id: &str) -> Result<Vec<Installment>> {
        Ok(self.sorted_installments(credit_id))
    }

    async fn update_installment(&mut self, installment: &Installment) -> Result<()> {
        let stored = self
            .working
            .installments
            .iter_mut()
            .find(|i| i.id == installment.id)
            .ok_or_else(|| AppError::not_found("Installment not found"))?;
        stored.paid_amount = installment.paid_amount;
        stored.status = installment.status;
        stored.updated_at = installment.updated_at;
        Ok(())
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<()> {
        self.working.payments.push(payment.clone());
        Ok(())
    }

    async fn insert_allocation(&mut self, allocation: &PaymentAllocation) -> Result<()> {
        self.working.allocations.push(allocation.clone());
        Ok(())
    }

    async fn list_allocations_for_credit(
        &mut self,
        credit_id: &str,
    ) -> Result<Vec<PaymentAllocation>> {
        let payment_ids: Vec<&str> = self
            .working
            .payments
            .iter()
            .filter(|p| p.credit_id == credit_id)
            .map(|p| p.id.as_str())
            .collect();

        Ok(self
            .working
            .allocations
            .iter()
            .filter(|a| payment_ids.contains(&a.payment_id.as_str()))
            .cloned()
            .collect())
    }

    async fn commit(self) -> Result<()> {
        let MemoryUnitOfWork {
            mut guard, working, ..
        } = self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}
