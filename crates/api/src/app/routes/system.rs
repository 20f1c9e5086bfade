//! Liveness probe.

use axum::{response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "message": "hivewatch API running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
