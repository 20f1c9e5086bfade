//! Route registration, one module per area.

use axum::routing::get;
use axum::Router;

pub mod accounts;
pub mod auth;
pub mod hives;
pub mod roles;
pub mod system;
pub mod telemetry;

pub fn router() -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/accounts", accounts::router())
        .nest("/api/roles", roles::router())
        .nest("/api/hives", hives::router())
        .nest("/api/telemetry", telemetry::router())
        .route("/api/health", get(system::health))
}
