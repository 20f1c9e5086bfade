//! Account lifecycle endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use hivewatch_core::{AccountUpdate, NewAccount};

use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/:id", put(update_account).delete(delete_account))
}

/// GET /api/accounts — active accounts in id order.
pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.accounts.list().await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => errors::error_response(e),
    }
}

/// POST /api/accounts — provision an account.
pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewAccount>,
) -> axum::response::Response {
    match services.accounts.create(body).await {
        Ok(account) => (StatusCode::CREATED, Json(json!({ "account": account }))).into_response(),
        Err(e) => errors::error_response(e),
    }
}

/// PUT /api/accounts/:id — replace profile fields; secret optional.
pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<AccountUpdate>,
) -> axum::response::Response {
    match services.accounts.update(&id, body).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Err(e) => errors::error_response(e),
    }
}

/// DELETE /api/accounts/:id — soft-delete, refused while hives remain.
pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.accounts.delete(&id).await {
        Ok(deleted) => (StatusCode::OK, Json(deleted)).into_response(),
        Err(e) => errors::error_response(e),
    }
}
