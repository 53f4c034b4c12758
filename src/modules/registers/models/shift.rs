use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Period during which agents may operate a register.
/// At most one shift per register has `closed_at == None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub register_id: String,
    pub opened_by: String,
    pub opened_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

impl Shift {
    pub fn open(register_id: String, opened_by: String, opened_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            register_id,
            opened_by,
            opened_at,
            closed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}
