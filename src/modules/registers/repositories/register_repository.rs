use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::core::{AppError, Result};
use crate::modules::registers::models::{
    CashRegister, EntryCategory, EntryKind, LedgerEntry, RegisterStatus, Shift,
};

/// MySQL access to cash registers, shifts and ledger entries
pub struct RegisterRepository;

impl RegisterRepository {
    /// Lock a register row by id
    pub async fn lock_by_id(
        conn: &mut MySqlConnection,
        register_id: &str,
    ) -> Result<Option<CashRegister>> {
        let row = sqlx::query_as::<_, CashRegisterRow>(
            r#"
            SELECT id, route_id, current_balance, status, updated_at
            FROM cash_registers
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(register_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(CashRegister::try_from).transpose()
    }

    /// Lock the register assigned to a route
    pub async fn lock_by_route(
        conn: &mut MySqlConnection,
        route_id: &str,
    ) -> Result<Option<CashRegister>> {
        let row = sqlx::query_as::<_, CashRegisterRow>(
            r#"
            SELECT id, route_id, current_balance, status, updated_at
            FROM cash_registers
            WHERE route_id = ?
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(route_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(CashRegister::try_from).transpose()
    }

    pub async fn update_balance(
        conn: &mut MySqlConnection,
        register_id: &str,
        balance: Decimal,
        at: NaiveDateTime,
    ) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE cash_registers
            SET current_balance = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(balance)
        .bind(at)
        .bind(register_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Cash register not found"));
        }

        Ok(())
    }

    /// Latest open shift of the register, read with a row lock so a shift
    /// closed by a concurrent transaction is never reported as open
    pub async fn find_open_shift(
        conn: &mut MySqlConnection,
        register_id: &str,
    ) -> Result<Option<Shift>> {
        let row: Option<(String, String, String, NaiveDateTime, Option<NaiveDateTime>)> =
            sqlx::query_as(
                r#"
                SELECT id, register_id, opened_by, opened_at, closed_at
                FROM shifts
                WHERE register_id = ? AND closed_at IS NULL
                ORDER BY opened_at DESC
                LIMIT 1
                FOR UPDATE
                "#,
            )
            .bind(register_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(|(id, register_id, opened_by, opened_at, closed_at)| Shift {
            id,
            register_id,
            opened_by,
            opened_at,
            closed_at,
        }))
    }

    pub async fn insert_shift(conn: &mut MySqlConnection, shift: &Shift) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO shifts (id, register_id, opened_by, opened_at, closed_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.register_id)
        .bind(&shift.opened_by)
        .bind(shift.opened_at)
        .bind(shift.closed_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn close_shift(
        conn: &mut MySqlConnection,
        shift_id: &str,
        closed_at: NaiveDateTime,
    ) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE shifts
            SET closed_at = ?
            WHERE id = ? AND closed_at IS NULL
            "#,
        )
        .bind(closed_at)
        .bind(shift_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Open shift not found"));
        }

        Ok(())
    }

    pub async fn insert_entry(conn: &mut MySqlConnection, entry: &LedgerEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ledger_entries (
                id, register_id, kind, amount, balance_before, balance_after,
                category, description, user_id, shift_id, client_id,
                credit_id, payment_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.register_id)
        .bind(entry.kind.as_str())
        .bind(entry.amount)
        .bind(entry.balance_before)
        .bind(entry.balance_after)
        .bind(entry.category.as_str())
        .bind(&entry.description)
        .bind(&entry.user_id)
        .bind(&entry.shift_id)
        .bind(&entry.client_id)
        .bind(&entry.credit_id)
        .bind(&entry.payment_id)
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Entries in the order they were appended
    pub async fn find_entries(
        conn: &mut MySqlConnection,
        register_id: &str,
    ) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerEntryRow>(
            r#"
            SELECT
                id, register_id, kind, amount, balance_before, balance_after,
                category, description, user_id, shift_id, client_id,
                credit_id, payment_id, created_at
            FROM ledger_entries
            WHERE register_id = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(register_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }
}

/// Database row representation for cash_registers table
#[derive(sqlx::FromRow)]
struct CashRegisterRow {
    id: String,
    route_id: String,
    current_balance: Decimal,
    status: String,
    updated_at: NaiveDateTime,
}

impl TryFrom<CashRegisterRow> for CashRegister {
    type Error = AppError;

    fn try_from(row: CashRegisterRow) -> Result<Self> {
        Ok(CashRegister {
            status: RegisterStatus::try_from(row.status).map_err(AppError::Internal)?,
            id: row.id,
            route_id: row.route_id,
            current_balance: row.current_balance,
            updated_at: row.updated_at,
        })
    }
}

/// Database row representation for ledger_entries table
#[derive(sqlx::FromRow)]
struct LedgerEntryRow {
    id: String,
    register_id: String,
    kind: String,
    amount: Decimal,
    balance_before: Decimal,
    balance_after: Decimal,
    category: String,
    description: String,
    user_id: String,
    shift_id: Option<String>,
    client_id: Option<String>,
    credit_id: Option<String>,
    payment_id: Option<String>,
    created_at: NaiveDateTime,
}

impl TryFrom<LedgerEntryRow> for LedgerEntry {
    type Error = AppError;

    fn try_from(row: LedgerEntryRow) -> Result<Self> {
        let category = match row.category.as_str() {
            "income" => EntryCategory::Income,
            "expense" => EntryCategory::Expense,
            other => {
                return Err(AppError::internal(format!(
                    "Invalid ledger entry category: {}",
                    other
                )))
            }
        };

        Ok(LedgerEntry {
            kind: EntryKind::try_from(row.kind).map_err(AppError::Internal)?,
            category,
            id: row.id,
            register_id: row.register_id,
            amount: row.amount,
            balance_before: row.balance_before,
            balance_after: row.balance_after,
            description: row.description,
            user_id: row.user_id,
            shift_id: row.shift_id,
            client_id: row.client_id,
            credit_id: row.credit_id,
            payment_id: row.payment_id,
            created_at: row.created_at,
        })
    }
}
