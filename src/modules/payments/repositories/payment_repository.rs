use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::core::Result;
use crate::modules::payments::models::{Payment, PaymentAllocation};

/// MySQL access to payments and their allocations
pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn insert(conn: &mut MySqlConnection, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, credit_id, amount, method, payment_type, status,
                client_id, user_id, shift_id, location, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.credit_id)
        .bind(payment.amount)
        .bind(&payment.method)
        .bind(payment.payment_type.as_str())
        .bind(&payment.status)
        .bind(&payment.client_id)
        .bind(&payment.user_id)
        .bind(&payment.shift_id)
        .bind(&payment.location)
        .bind(payment.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn insert_allocation(
        conn: &mut MySqlConnection,
        allocation: &PaymentAllocation,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_allocations (
                payment_id, installment_id, amount_applied,
                capital_portion, interest_portion, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&allocation.payment_id)
        .bind(&allocation.installment_id)
        .bind(allocation.amount_applied)
        .bind(allocation.capital_portion)
        .bind(allocation.interest_portion)
        .bind(allocation.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Allocations of every payment made against a credit, in application order
    pub async fn find_allocations_by_credit(
        conn: &mut MySqlConnection,
        credit_id: &str,
    ) -> Result<Vec<PaymentAllocation>> {
        let rows = sqlx::query_as::<_, PaymentAllocationRow>(
            r#"
            SELECT
                pa.payment_id, pa.installment_id, pa.amount_applied,
                pa.capital_portion, pa.interest_portion, pa.created_at
            FROM payment_allocations pa
            INNER JOIN payments p ON p.id = pa.payment_id
            WHERE p.credit_id = ?
            ORDER BY pa.id ASC
            "#,
        )
        .bind(credit_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(PaymentAllocation::from).collect())
    }
}

/// Database row representation for payment_allocations table
#[derive(sqlx::FromRow)]
struct PaymentAllocationRow {
    payment_id: String,
    installment_id: String,
    amount_applied: Decimal,
    capital_portion: Decimal,
    interest_portion: Decimal,
    created_at: NaiveDateTime,
}

impl From<PaymentAllocationRow> for PaymentAllocation {
    fn from(row: PaymentAllocationRow) -> Self {
        PaymentAllocation {
            payment_id: row.payment_id,
            installment_id: row.installment_id,
            amount_applied: row.amount_applied,
            capital_portion: row.capital_portion,
            interest_portion: row.interest_portion,
            created_at: row.created_at,
        }
    }
}
