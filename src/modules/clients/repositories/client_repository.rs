use sqlx::MySqlConnection;

use crate::core::Result;
use crate::modules::clients::models::ClientRecord;

/// Read-only view of the client directory
pub struct ClientRepository;

impl ClientRepository {
    /// Lock a client row; origination counts the client's active credits under this lock
    pub async fn lock_by_id(
        conn: &mut MySqlConnection,
        client_id: &str,
    ) -> Result<Option<ClientRecord>> {
        let row: Option<(String, String, String, bool)> = sqlx::query_as(
            r#"
            SELECT id, name, route_id, verified
            FROM clients
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(client_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(|(id, name, route_id, verified)| ClientRecord {
            id,
            name,
            route_id,
            verified,
        }))
    }
}
