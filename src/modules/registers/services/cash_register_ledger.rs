use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error};

use crate::core::{money, AppError, Result, UnitOfWork, ValidationError};
use crate::modules::registers::models::{
    CashRegister, EntryCategory, EntryKind, EntryMeta, LedgerEntry, Shift,
};

/// Result of replaying a register's ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterVerification {
    pub register_id: String,
    pub entry_count: usize,
    pub current_balance: Decimal,
}

/// Pair of entries written by a transfer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferEntries {
    pub outgoing: LedgerEntry,
    pub incoming: LedgerEntry,
}

/// Register balance bookkeeping. Every balance change is written together with its entry.
pub struct CashRegisterLedger;

impl CashRegisterLedger {
    /// Take `amount` out of a register. `meta.kind` must be an expense kind.
    pub async fn debit<U: UnitOfWork>(
        uow: &mut U,
        register_id: &str,
        amount: Decimal,
        meta: EntryMeta,
        at: NaiveDateTime,
    ) -> Result<LedgerEntry> {
        if meta.kind.category() != EntryCategory::Expense {
            return Err(AppError::internal(format!(
                "{} is not a debit entry kind",
                meta.kind
            )));
        }
        Self::post(uow, register_id, amount, meta, at).await
    }

    /// Put `amount` into a register. `meta.kind` must be an income kind.
    pub async fn credit<U: UnitOfWork>(
        uow: &mut U,
        register_id: &str,
        amount: Decimal,
        meta: EntryMeta,
        at: NaiveDateTime,
    ) -> Result<LedgerEntry> {
        if meta.kind.category() != EntryCategory::Income {
            return Err(AppError::internal(format!(
                "{} is not a credit entry kind",
                meta.kind
            )));
        }
        Self::post(uow, register_id, amount, meta, at).await
    }

    async fn post<U: UnitOfWork>(
        uow: &mut U,
        register_id: &str,
        amount: Decimal,
        meta: EntryMeta,
        at: NaiveDateTime,
    ) -> Result<LedgerEntry> {
        money::validate_amount(amount)?;

        let register = Self::lock_open_register(uow, register_id).await?;
        let shift = uow.find_open_shift(register_id).await?;
        if meta.kind.requires_shift() && shift.is_none() {
            return Err(ValidationError::NoActiveShift.into());
        }

        if meta.kind.category() == EntryCategory::Expense && amount > register.current_balance {
            return Err(ValidationError::InsufficientBalance {
                available: register.current_balance,
                requested: amount,
            }
            .into());
        }

        let entry = LedgerEntry::record(
            register.id,
            amount,
            register.current_balance,
            shift.map(|s| s.id),
            meta,
            at,
        );

        uow.update_register_balance(register_id, entry.balance_after, at)
            .await?;
        uow.append_ledger_entry(&entry).await?;

        debug!(
            register_id = %entry.register_id,
            kind = %entry.kind,
            amount = %entry.amount,
            balance_after = %entry.balance_after,
            "Ledger entry recorded"
        );

        Ok(entry)
    }

    /// Move cash between two registers inside the caller's unit of work
    pub async fn transfer<U: UnitOfWork>(
        uow: &mut U,
        from_register_id: &str,
        to_register_id: &str,
        amount: Decimal,
        user_id: &str,
        at: NaiveDateTime,
    ) -> Result<TransferEntries> {
        if from_register_id == to_register_id {
            return Err(ValidationError::SameRegisterTransfer.into());
        }
        money::validate_positive_amount(amount)?;

        // Fixed lock order keeps opposite transfers from deadlocking
        let (first, second) = if from_register_id < to_register_id {
            (from_register_id, to_register_id)
        } else {
            (to_register_id, from_register_id)
        };
        Self::lock_open_register(uow, first).await?;
        Self::lock_open_register(uow, second).await?;

        let outgoing = Self::debit(
            uow,
            from_register_id,
            amount,
            EntryMeta::new(
                EntryKind::TransferOut,
                format!("Transfer to register {}", to_register_id),
                user_id,
            ),
            at,
        )
        .await?;

        let incoming = Self::credit(
            uow,
            to_register_id,
            amount,
            EntryMeta::new(
                EntryKind::TransferIn,
                format!("Transfer from register {}", from_register_id),
                user_id,
            ),
            at,
        )
        .await?;

        Ok(TransferEntries { outgoing, incoming })
    }

    pub async fn open_shift<U: UnitOfWork>(
        uow: &mut U,
        register_id: &str,
        user_id: &str,
        at: NaiveDateTime,
    ) -> Result<Shift> {
        Self::lock_open_register(uow, register_id).await?;

        if uow.find_open_shift(register_id).await?.is_some() {
            return Err(ValidationError::ShiftAlreadyOpen.into());
        }

        let shift = Shift::open(register_id.to_string(), user_id.to_string(), at);
        uow.insert_shift(&shift).await?;
        Ok(shift)
    }

    pub async fn close_shift<U: UnitOfWork>(
        uow: &mut U,
        register_id: &str,
        at: NaiveDateTime,
    ) -> Result<Shift> {
        uow.lock_register(register_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cash register not found"))?;

        let mut shift = uow
            .find_open_shift(register_id)
            .await?
            .ok_or(ValidationError::NoActiveShift)?;

        uow.close_shift(&shift.id, at).await?;
        shift.closed_at = Some(at);
        Ok(shift)
    }

    /// Replay every entry of a register and check it against the stored balance
    pub async fn verify<U: UnitOfWork>(
        uow: &mut U,
        register_id: &str,
    ) -> Result<RegisterVerification> {
        let register = uow
            .lock_register(register_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cash register not found"))?;
        let entries = uow.list_ledger_entries(register_id).await?;

        let mut previous: Option<&LedgerEntry> = None;
        for entry in &entries {
            if !entry.is_balanced() {
                return Err(Self::broken(register_id, entry, "entry does not balance"));
            }
            if let Some(prev) = previous {
                if prev.balance_after != entry.balance_before {
                    return Err(Self::broken(register_id, entry, "entry does not chain"));
                }
            }
            previous = Some(entry);
        }

        if let Some(last) = previous {
            if last.balance_after != register.current_balance {
                return Err(Self::broken(
                    register_id,
                    last,
                    "register balance differs from last entry",
                ));
            }
        }

        Ok(RegisterVerification {
            register_id: register.id,
            entry_count: entries.len(),
            current_balance: register.current_balance,
        })
    }

    async fn lock_open_register<U: UnitOfWork>(
        uow: &mut U,
        register_id: &str,
    ) -> Result<CashRegister> {
        let register = uow
            .lock_register(register_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cash register not found"))?;

        if !register.is_open() {
            return Err(ValidationError::RegisterClosed.into());
        }

        Ok(register)
    }

    fn broken(register_id: &str, entry: &LedgerEntry, reason: &str) -> AppError {
        error!(
            register_id = %register_id,
            entry_id = %entry.id,
            balance_before = %entry.balance_before,
            balance_after = %entry.balance_after,
            reason = reason,
            "Ledger verification failed"
        );
        AppError::consistency(format!(
            "Register {} ledger broken at entry {}: {}",
            register_id, entry.id, reason
        ))
    }
}
