//! Consistent error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hivewatch_core::CoreError;

/// Map a core error to its response. Storage and internal failures log
/// their detail here and answer with a generic body — drivers' messages
/// never reach the caller.
pub fn error_response(err: CoreError) -> axum::response::Response {
    match err {
        CoreError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CoreError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        CoreError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "conflict", msg),
        CoreError::Authentication => json_error(
            StatusCode::UNAUTHORIZED,
            "authentication_failed",
            "invalid credentials",
        ),
        CoreError::Storage {
            message,
            code,
            query,
        } => {
            tracing::error!(message = %message, code = ?code, query = %query, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "internal storage error",
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(message = %msg, "internal failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
