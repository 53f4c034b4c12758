use serde::{Deserialize, Serialize};

/// Client as exposed by the client directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub route_id: String,
    /// False when the client's data must be updated before new credit
    pub verified: bool,
}

impl ClientRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        route_id: impl Into<String>,
        verified: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            route_id: route_id.into(),
            verified,
        }
    }
}
