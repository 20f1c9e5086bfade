//! Hive listing (read-only).

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new().route("/", get(list_hives))
}

pub async fn list_hives(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.list_hives().await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => errors::error_response(e.into()),
    }
}
