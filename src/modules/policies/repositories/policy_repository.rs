use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::core::{AppError, Result};
use crate::modules::policies::models::RouteCreditPolicy;

/// Reads per-route credit policies
pub struct PolicyRepository;

impl PolicyRepository {
    /// Find the active policy for a route
    pub async fn find_active_by_route(
        conn: &mut MySqlConnection,
        route_id: &str,
    ) -> Result<Option<RouteCreditPolicy>> {
        let row = sqlx::query_as::<_, RouteCreditPolicyRow>(
            r#"
            SELECT
                route_id, amount_min, amount_max, term_min, term_max,
                allowed_frequencies, interest_rate_percent, max_active_credits
            FROM route_credit_policies
            WHERE route_id = ? AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(route_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(RouteCreditPolicy::try_from).transpose()
    }
}

/// Database row representation for route_credit_policies table
#[derive(sqlx::FromRow)]
struct RouteCreditPolicyRow {
    route_id: String,
    amount_min: Decimal,
    amount_max: Decimal,
    term_min: i32,
    term_max: i32,
    allowed_frequencies: String,
    interest_rate_percent: Decimal,
    max_active_credits: i32,
}

impl TryFrom<RouteCreditPolicyRow> for RouteCreditPolicy {
    type Error = AppError;

    fn try_from(row: RouteCreditPolicyRow) -> Result<Self> {
        Ok(RouteCreditPolicy {
            allowed_frequencies: RouteCreditPolicy::parse_frequencies(&row.allowed_frequencies)?,
            route_id: row.route_id,
            amount_min: row.amount_min,
            amount_max: row.amount_max,
            term_min: row.term_min,
            term_max: row.term_max,
            interest_rate_percent: row.interest_rate_percent,
            max_active_credits_per_client: row.max_active_credits,
        })
    }
}
