use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ledgerdesk_core::DomainError;
use ledgerdesk_infra::projections::ProjectionError;

/// Handler result: both arms are complete responses.
pub type ApiResult = Result<Response, Response>;

pub fn domain_error_to_response(err: DomainError) -> Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        DomainError::InvariantViolation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", message)
        }
    }
}

pub fn projection_error_to_response(err: ProjectionError) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", err.to_string())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
