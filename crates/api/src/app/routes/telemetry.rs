//! Telemetry ingestion and recent-readings queries.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use hivewatch_core::{CoreError, NewReading};

use crate::app::{errors, services::AppServices};

const DEFAULT_WINDOW_HOURS: u32 = 24;
const DEFAULT_LIMIT: u32 = 500;

pub fn router() -> Router {
    Router::new()
        .route("/", post(ingest_reading))
        .route("/recent", get(recent_readings))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub hours: Option<u32>,
    pub limit: Option<u32>,
}

/// POST /api/telemetry — store one reading posted by a field node.
pub async fn ingest_reading(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewReading>,
) -> axum::response::Response {
    let node_id = match required(body.node_id.as_deref(), "node_id") {
        Ok(v) => v,
        Err(e) => return errors::error_response(e),
    };
    let topic = match required(body.topic.as_deref(), "topic") {
        Ok(v) => v,
        Err(e) => return errors::error_response(e),
    };
    let payload = match body.payload_text() {
        Some(p) => p,
        None => return errors::error_response(CoreError::validation("payload is required")),
    };

    match services.store.insert_reading(&node_id, &topic, &payload).await {
        Ok(reading) => (StatusCode::CREATED, Json(json!({ "reading": reading }))).into_response(),
        Err(e) => errors::error_response(e.into()),
    }
}

/// GET /api/telemetry/recent?hours=&limit= — readings from the window,
/// oldest first, with parsed measurement fields.
pub async fn recent_readings(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<RecentQuery>,
) -> axum::response::Response {
    let hours = query.hours.unwrap_or(DEFAULT_WINDOW_HOURS);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    match services.store.recent_readings(hours, limit).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => errors::error_response(e.into()),
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::validation(format!("{field} is required"))),
    }
}
