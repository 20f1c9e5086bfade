//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: construction of the service set injected into handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use hivewatch_store::DirectoryStore;

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and
/// the black-box tests).
pub fn build_app(store: Arc<dyn DirectoryStore>) -> Router {
    let services = Arc::new(services::AppServices::new(store));

    routes::router()
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_logging)))
}
