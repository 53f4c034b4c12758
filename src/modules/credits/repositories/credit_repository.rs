use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::core::{AppError, Result};
use crate::modules::credits::models::{Credit, CreditStatus};
use crate::modules::policies::models::Frequency;

const CREDIT_COLUMNS: &str = r#"
    id, principal, term_days, frequency, interest_rate_percent, interest_amount,
    total_debt, balance, status, client_id, user_id, product_id, route_id,
    shift_id, due_date, created_at, updated_at
"#;

/// MySQL access to the credits table
pub struct CreditRepository;

impl CreditRepository {
    pub async fn insert(conn: &mut MySqlConnection, credit: &Credit) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO credits (
                id, principal, term_days, frequency, interest_rate_percent, interest_amount,
                total_debt, balance, status, client_id, user_id, product_id, route_id,
                shift_id, due_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&credit.id)
        .bind(credit.principal)
        .bind(credit.term_days)
        .bind(credit.frequency.as_str())
        .bind(credit.interest_rate_percent)
        .bind(credit.interest_amount)
        .bind(credit.total_debt)
        .bind(credit.balance)
        .bind(credit.status.as_str())
        .bind(&credit.client_id)
        .bind(&credit.user_id)
        .bind(&credit.product_id)
        .bind(&credit.route_id)
        .bind(&credit.shift_id)
        .bind(credit.due_date)
        .bind(credit.created_at)
        .bind(credit.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(conn: &mut MySqlConnection, id: &str) -> Result<Option<Credit>> {
        let sql = format!("SELECT {} FROM credits WHERE id = ?", CREDIT_COLUMNS);
        let row = sqlx::query_as::<_, CreditRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(Credit::try_from).transpose()
    }

    /// Same as [`CreditRepository::find_by_id`] with an exclusive row lock
    pub async fn lock_by_id(conn: &mut MySqlConnection, id: &str) -> Result<Option<Credit>> {
        let sql = format!("SELECT {} FROM credits WHERE id = ? FOR UPDATE", CREDIT_COLUMNS);
        let row = sqlx::query_as::<_, CreditRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(Credit::try_from).transpose()
    }

    /// Count the client's unpaid credits with a locking read.
    ///
    /// A plain `SELECT` would see the snapshot taken at the first consistent
    /// read of the transaction, missing credits committed since then.
    pub async fn count_unpaid_by_client(conn: &mut MySqlConnection, client_id: &str) -> Result<i64> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM credits
            WHERE client_id = ? AND status = ?
            FOR UPDATE
            "#,
        )
        .bind(client_id)
        .bind(CreditStatus::Unpaid.as_str())
        .fetch_all(&mut *conn)
        .await?;

        Ok(ids.len() as i64)
    }

    /// Persist balance and status after a payment
    pub async fn update_balance(conn: &mut MySqlConnection, credit: &Credit) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE credits
            SET balance = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(credit.balance)
        .bind(credit.status.as_str())
        .bind(credit.updated_at)
        .bind(&credit.id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Credit not found"));
        }

        Ok(())
    }
}

/// Database row representation for credits table
#[derive(sqlx::FromRow)]
struct CreditRow {
    id: String,
    principal: Decimal,
    term_days: i32,
    frequency: String,
    interest_rate_percent: Decimal,
    interest_amount: Decimal,
    total_debt: Decimal,
    balance: Decimal,
    status: String,
    client_id: String,
    user_id: String,
    product_id: String,
    route_id: String,
    shift_id: String,
    due_date: NaiveDate,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<CreditRow> for Credit {
    type Error = AppError;

    fn try_from(row: CreditRow) -> Result<Self> {
        Ok(Credit {
            frequency: Frequency::try_from(row.frequency)?,
            status: CreditStatus::try_from(row.status).map_err(AppError::Internal)?,
            id: row.id,
            principal: row.principal,
            term_days: row.term_days,
            interest_rate_percent: row.interest_rate_percent,
            interest_amount: row.interest_amount,
            total_debt: row.total_debt,
            balance: row.balance,
            client_id: row.client_id,
            user_id: row.user_id,
            product_id: row.product_id,
            route_id: row.route_id,
            shift_id: row.shift_id,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
