pub mod auth;
pub mod error_handler;

pub use auth::{AgentIdentity, USER_ID_HEADER};
pub use error_handler::{error_response, json_error_handler};
