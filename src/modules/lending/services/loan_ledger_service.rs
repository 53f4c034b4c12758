use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::core::{
    money, AppError, BusinessClock, LedgerStore, Result, UnitOfWork, ValidationError,
};
use crate::modules::credits::models::{Credit, CreditApplication, Installment, NewCredit};
use crate::modules::credits::services::{CreditOriginationValidator, InstallmentScheduler};
use crate::modules::lending::models::{
    CreditDetail, OriginationReceipt, PaymentReceipt, RecordExpenseRequest, RecordPaymentRequest,
    TransferCashRequest,
};
use crate::modules::payments::models::{Payment, PaymentAllocation};
use crate::modules::payments::services::PaymentAllocationEngine;
use crate::modules::policies::models::LendingSettings;
use crate::modules::registers::models::{EntryKind, EntryMeta, LedgerEntry, Shift};
use crate::modules::registers::services::{
    CashRegisterLedger, RegisterVerification, TransferEntries,
};

/// Orchestrates the ledger workflows.
///
/// Each public operation runs in one unit of work: it either commits as a whole or
/// rolls back as a whole.
pub struct LoanLedgerService<S: LedgerStore> {
    store: S,
    settings: LendingSettings,
    clock: BusinessClock,
}

impl<S: LedgerStore> LoanLedgerService<S> {
    pub fn new(store: S, settings: LendingSettings, clock: BusinessClock) -> Self {
        Self {
            store,
            settings,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, schedule, persist and disburse a new credit
    pub async fn originate_credit(
        &self,
        application: CreditApplication,
    ) -> Result<OriginationReceipt> {
        info!(
            client_id = %application.client_id,
            route_id = %application.route_id,
            amount = %application.amount,
            term_days = application.term_days,
            frequency = %application.frequency,
            "Originating credit"
        );

        let mut uow = self.store.begin().await?;
        let result = self.originate_in(&mut uow, &application).await;

        match &result {
            Ok(receipt) => info!(
                credit_id = %receipt.credit.id,
                total_debt = %receipt.credit.total_debt,
                installments = receipt.installments.len(),
                "Credit originated"
            ),
            Err(err) => log_failure("originate_credit", err),
        }

        finish(uow, result).await
    }

    async fn originate_in(
        &self,
        uow: &mut S::Uow,
        application: &CreditApplication,
    ) -> Result<OriginationReceipt> {
        let validated = CreditOriginationValidator::validate(uow, application).await?;
        let calendar = uow.load_calendar().await?;

        let today = self.clock.today();
        let now = self.clock.now_utc();

        let schedule = InstallmentScheduler::generate_schedule(
            application.amount,
            validated.policy.interest_rate_percent,
            application.term_days,
            validated.frequency,
            &calendar,
            today,
        )?;

        let credit = Credit::originate(NewCredit {
            principal: application.amount,
            term_days: application.term_days,
            frequency: validated.frequency,
            interest_rate_percent: validated.policy.interest_rate_percent,
            client_id: validated.client.id.clone(),
            user_id: application.user_id.clone(),
            product_id: application.product_id.clone(),
            route_id: application.route_id.clone(),
            shift_id: validated.shift.id.clone(),
            disbursed_on: today,
            created_at: now,
        })?;

        let scheduled_total: Decimal = schedule.iter().map(|s| s.amount).sum();
        if scheduled_total != credit.total_debt {
            return Err(AppError::consistency(format!(
                "Schedule total {} differs from total debt {}",
                scheduled_total, credit.total_debt
            )));
        }

        let installments = schedule
            .into_iter()
            .map(|s| {
                Installment::new(
                    credit.id.clone(),
                    s.installment_number,
                    s.amount,
                    s.due_date,
                    now,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        uow.insert_credit(&credit).await?;
        uow.insert_installments(&installments).await?;

        let disbursement = CashRegisterLedger::debit(
            uow,
            &validated.register.id,
            credit.principal,
            EntryMeta::new(
                EntryKind::Disbursement,
                format!("Credit disbursement - client {}", validated.client.name),
                application.user_id.as_str(),
            )
            .with_client(credit.client_id.as_str())
            .with_credit(credit.id.as_str()),
            now,
        )
        .await?;

        Ok(OriginationReceipt {
            credit,
            installments,
            disbursement,
        })
    }

    /// Collect a payment (or record a visit) against a credit
    pub async fn record_payment(
        &self,
        credit_id: &str,
        user_id: &str,
        request: RecordPaymentRequest,
    ) -> Result<PaymentReceipt> {
        info!(
            credit_id = %credit_id,
            amount = %request.amount,
            method = %request.method,
            "Recording payment"
        );

        let mut uow = self.store.begin().await?;
        let result = self
            .record_payment_in(&mut uow, credit_id, user_id, request)
            .await;

        match &result {
            Ok(receipt) => info!(
                credit_id = %credit_id,
                payment_id = %receipt.payment.id,
                payment_type = %receipt.payment.payment_type,
                balance = %receipt.credit.balance,
                status = %receipt.credit.status,
                "Payment recorded"
            ),
            Err(err) => log_failure("record_payment", err),
        }

        finish(uow, result).await
    }

    async fn record_payment_in(
        &self,
        uow: &mut S::Uow,
        credit_id: &str,
        user_id: &str,
        request: RecordPaymentRequest,
    ) -> Result<PaymentReceipt> {
        let mut credit = uow
            .lock_credit(credit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Credit not found"))?;
        let mut installments = uow.lock_installments(credit_id).await?;

        let amount = request.amount;
        money::validate_amount(amount)?;

        let max_amount = money::round2(
            credit.total_debt * self.settings.max_partial_payment_percent / Decimal::ONE_HUNDRED,
        );
        if amount > max_amount {
            return Err(ValidationError::PaymentExceedsMaxPercent {
                percent: self.settings.max_partial_payment_percent,
                max_amount,
            }
            .into());
        }

        if amount > credit.balance {
            return Err(ValidationError::PaymentExceedsOutstandingBalance {
                balance: credit.balance,
            }
            .into());
        }

        let register = uow
            .lock_register_for_route(&credit.route_id)
            .await?
            .ok_or(ValidationError::NoRegisterForRoute)?;
        if !register.is_open() {
            return Err(ValidationError::RegisterClosed.into());
        }
        let shift = uow
            .find_open_shift(&register.id)
            .await?
            .ok_or(ValidationError::NoActiveShift)?;

        let now = self.clock.now_utc();
        let payment = Payment::new(
            credit.id.clone(),
            amount,
            request.method,
            credit.client_id.clone(),
            user_id.to_string(),
            shift.id,
            request.location,
            now,
        );

        let mut allocations: Vec<PaymentAllocation> = Vec::new();
        if !payment.is_visit() {
            let installment_count = installments.len();
            let outcome = PaymentAllocationEngine::allocate(
                amount,
                &mut installments,
                credit.principal,
                credit.interest_amount,
                installment_count,
                now,
            )?;

            if outcome.remainder > Decimal::ZERO {
                error!(
                    credit_id = %credit.id,
                    amount = %amount,
                    remainder = %outcome.remainder,
                    balance = %credit.balance,
                    "Payment left a remainder after every installment was settled"
                );
                return Err(AppError::consistency(format!(
                    "Allocation remainder {} on credit {}",
                    outcome.remainder, credit.id
                )));
            }

            allocations = outcome
                .allocations
                .into_iter()
                .map(|planned| planned.into_allocation(&payment.id, now))
                .collect();

            credit.apply_payment(amount, now)?;
        }

        uow.insert_payment(&payment).await?;
        for allocation in &allocations {
            uow.insert_allocation(allocation).await?;
        }

        let touched: HashSet<&str> = allocations
            .iter()
            .map(|a| a.installment_id.as_str())
            .collect();
        for installment in installments
            .iter()
            .filter(|i| touched.contains(i.id.as_str()))
        {
            uow.update_installment(installment).await?;
        }

        if !payment.is_visit() {
            uow.update_credit_balance(&credit).await?;
        }

        let description = if payment.is_visit() {
            format!("Visit - credit {}", credit.id)
        } else {
            format!("Credit payment - credit {}", credit.id)
        };
        let collection = CashRegisterLedger::credit(
            uow,
            &register.id,
            amount,
            EntryMeta::new(EntryKind::Collection, description, user_id)
                .with_client(credit.client_id.as_str())
                .with_credit(credit.id.as_str())
                .with_payment(payment.id.as_str()),
            now,
        )
        .await?;

        Ok(PaymentReceipt {
            payment,
            allocations,
            credit,
            collection,
        })
    }

    /// Move cash from one register to another
    pub async fn transfer_cash(
        &self,
        user_id: &str,
        request: TransferCashRequest,
    ) -> Result<TransferEntries> {
        let mut uow = self.store.begin().await?;
        let result = CashRegisterLedger::transfer(
            &mut uow,
            &request.from_register_id,
            &request.to_register_id,
            request.amount,
            user_id,
            self.clock.now_utc(),
        )
        .await;

        match &result {
            Ok(_) => info!(
                from_register_id = %request.from_register_id,
                to_register_id = %request.to_register_id,
                amount = %request.amount,
                "Cash transferred"
            ),
            Err(err) => log_failure("transfer_cash", err),
        }

        finish(uow, result).await
    }

    /// Pay an operating expense out of a register
    pub async fn record_expense(
        &self,
        register_id: &str,
        user_id: &str,
        request: RecordExpenseRequest,
    ) -> Result<LedgerEntry> {
        let mut uow = self.store.begin().await?;
        let result = match money::validate_positive_amount(request.amount) {
            Ok(()) => {
                CashRegisterLedger::debit(
                    &mut uow,
                    register_id,
                    request.amount,
                    EntryMeta::new(EntryKind::Expense, request.description, user_id),
                    self.clock.now_utc(),
                )
                .await
            }
            Err(err) => Err(err.into()),
        };

        match &result {
            Ok(entry) => info!(
                register_id = %register_id,
                amount = %entry.amount,
                balance_after = %entry.balance_after,
                "Expense recorded"
            ),
            Err(err) => log_failure("record_expense", err),
        }

        finish(uow, result).await
    }

    pub async fn open_shift(&self, register_id: &str, user_id: &str) -> Result<Shift> {
        let mut uow = self.store.begin().await?;
        let result =
            CashRegisterLedger::open_shift(&mut uow, register_id, user_id, self.clock.now_utc())
                .await;

        match &result {
            Ok(shift) => info!(register_id = %register_id, shift_id = %shift.id, "Shift opened"),
            Err(err) => log_failure("open_shift", err),
        }

        finish(uow, result).await
    }

    pub async fn close_shift(&self, register_id: &str) -> Result<Shift> {
        let mut uow = self.store.begin().await?;
        let result =
            CashRegisterLedger::close_shift(&mut uow, register_id, self.clock.now_utc()).await;

        match &result {
            Ok(shift) => info!(register_id = %register_id, shift_id = %shift.id, "Shift closed"),
            Err(err) => log_failure("close_shift", err),
        }

        finish(uow, result).await
    }

    /// Credit with its schedule and allocation history
    pub async fn credit_detail(&self, credit_id: &str) -> Result<CreditDetail> {
        let mut uow = self.store.begin().await?;
        let result = async {
            let credit = uow
                .find_credit(credit_id)
                .await?
                .ok_or_else(|| AppError::not_found("Credit not found"))?;
            let installments = uow.list_installments(credit_id).await?;
            let allocations = uow.list_allocations_for_credit(credit_id).await?;
            Ok::<_, AppError>(CreditDetail {
                credit,
                installments,
                allocations,
            })
        }
        .await;

        finish(uow, result).await
    }

    /// Replay a register's ledger against its stored balance
    pub async fn verify_register(&self, register_id: &str) -> Result<RegisterVerification> {
        let mut uow = self.store.begin().await?;
        let result = CashRegisterLedger::verify(&mut uow, register_id).await;
        finish(uow, result).await
    }
}

/// Commit on success, roll back on failure. The workflow's own error wins over a
/// rollback error.
async fn finish<U: UnitOfWork, T>(uow: U, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                error!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

fn log_failure(operation: &str, err: &AppError) {
    match err {
        AppError::Validation(_) | AppError::Configuration(_) | AppError::NotFound(_) => {
            warn!(operation = operation, reason = %err, "Request rejected")
        }
        AppError::Busy => warn!(operation = operation, "Lock wait timed out"),
        _ => error!(operation = operation, error = %err, "Workflow aborted"),
    }
}
