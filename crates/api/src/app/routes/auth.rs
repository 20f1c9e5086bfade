//! Login endpoint.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use hivewatch_auth::LoginRequest;

use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new().route("/login", post(login))
}

/// POST /api/auth/login — resolve, verify, mint a token.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    match services.authenticator.login(body).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "token": outcome.token,
                "account": outcome.account,
            })),
        )
            .into_response(),
        Err(e) => errors::error_response(e),
    }
}
