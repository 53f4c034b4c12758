use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};

/// Error body shared by every non-`AppError` rejection
pub fn error_response(status_code: StatusCode, kind: &str, message: String) -> HttpResponse {
    HttpResponse::build(status_code).json(serde_json::json!({
        "error": {
            "kind": kind,
            "message": message,
            "code": status_code.as_u16(),
        }
    }))
}

/// Malformed JSON bodies answer 400 in the same shape as application errors
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected request body");

    let response = error_response(StatusCode::BAD_REQUEST, "bad_request", err.to_string());
    actix_web::error::InternalError::from_response(err, response).into()
}
