use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::core::{AppError, Result};
use crate::modules::credits::models::{Installment, InstallmentStatus};

/// MySQL access to the installments table
pub struct InstallmentRepository;

impl InstallmentRepository {
    /// Insert a credit's whole schedule
    pub async fn insert_batch(
        conn: &mut MySqlConnection,
        installments: &[Installment],
    ) -> Result<()> {
        for installment in installments {
            sqlx::query(
                r#"
                INSERT INTO installments (
                    id, credit_id, installment_number, amount, paid_amount,
                    due_date, status, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&installment.id)
            .bind(&installment.credit_id)
            .bind(installment.installment_number)
            .bind(installment.amount)
            .bind(installment.paid_amount)
            .bind(installment.due_date)
            .bind(installment.status.as_str())
            .bind(installment.created_at)
            .bind(installment.updated_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    pub async fn find_by_credit(
        conn: &mut MySqlConnection,
        credit_id: &str,
    ) -> Result<Vec<Installment>> {
        Self::select_by_credit(conn, credit_id, false).await
    }

    /// Lock every installment of a credit, oldest due first
    pub async fn lock_by_credit(
        conn: &mut MySqlConnection,
        credit_id: &str,
    ) -> Result<Vec<Installment>> {
        Self::select_by_credit(conn, credit_id, true).await
    }

    async fn select_by_credit(
        conn: &mut MySqlConnection,
        credit_id: &str,
        for_update: bool,
    ) -> Result<Vec<Installment>> {
        let sql = format!(
            r#"
            SELECT
                id, credit_id, installment_number, amount, paid_amount,
                due_date, status, created_at, updated_at
            FROM installments
            WHERE credit_id = ?
            ORDER BY due_date ASC, installment_number ASC
            {}
            "#,
            if for_update { "FOR UPDATE" } else { "" }
        );

        let rows = sqlx::query_as::<_, InstallmentRow>(&sql)
            .bind(credit_id)
            .fetch_all(&mut *conn)
            .await?;

        rows.into_iter().map(Installment::try_from).collect()
    }

    /// Persist paid amount and status after an allocation
    pub async fn update_payment_state(
        conn: &mut MySqlConnection,
        installment: &Installment,
    ) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE installments
            SET paid_amount = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(installment.paid_amount)
        .bind(installment.status.as_str())
        .bind(installment.updated_at)
        .bind(&installment.id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Installment not found"));
        }

        Ok(())
    }
}

/// Database row representation for installments table
#[derive(sqlx::FromRow)]
struct InstallmentRow {
    id: String,
    credit_id: String,
    installment_number: i32,
    amount: Decimal,
    paid_amount: Decimal,
    due_date: NaiveDate,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<InstallmentRow> for Installment {
    type Error = AppError;

    fn try_from(row: InstallmentRow) -> Result<Self> {
        Ok(Installment {
            status: InstallmentStatus::try_from(row.status).map_err(AppError::Internal)?,
            id: row.id,
            credit_id: row.credit_id,
            installment_number: row.installment_number,
            amount: row.amount,
            paid_amount: row.paid_amount,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
