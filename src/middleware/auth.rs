use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::core::AppError;

/// Header carrying the already-authenticated agent id
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Agent on whose behalf a request runs.
///
/// Identity is established upstream; this extractor only requires the header to be
/// present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub user_id: String,
}

impl FromRequest for AgentIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        ready(match user_id {
            Some(user_id) => Ok(AgentIdentity { user_id }),
            None => Err(AppError::unauthorized("Missing X-User-Id header")),
        })
    }
}
