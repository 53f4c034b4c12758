use chrono::NaiveDate;
use sqlx::MySqlConnection;

use crate::core::Result;
use crate::modules::calendar::models::Calendar;

/// Reads the business calendar tables
pub struct CalendarRepository;

impl CalendarRepository {
    /// Load explicit exclusions and weekend flags. Missing settings mean no weekend exclusion.
    pub async fn load(conn: &mut MySqlConnection) -> Result<Calendar> {
        let dates: Vec<NaiveDate> =
            sqlx::query_scalar("SELECT day FROM non_business_days ORDER BY day")
                .fetch_all(&mut *conn)
                .await?;

        let flags: Option<(bool, bool)> = sqlx::query_as(
            r#"
            SELECT exclude_saturdays, exclude_sundays
            FROM calendar_settings
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *conn)
        .await?;

        let (exclude_saturdays, exclude_sundays) = flags.unwrap_or((false, false));

        Ok(Calendar::new(dates, exclude_saturdays, exclude_sundays))
    }
}
