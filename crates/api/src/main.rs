use std::sync::Arc;

use hivewatch_store::{DbConfig, MySqlDirectoryStore};

#[tokio::main]
async fn main() {
    hivewatch_observability::init();

    let config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "database configuration incomplete");
            std::process::exit(1);
        }
    };

    let pool = match config.connect().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to MySQL");
            std::process::exit(1);
        }
    };
    tracing::info!(host = %config.host, database = %config.database, "connected to MySQL");

    let store = MySqlDirectoryStore::new(pool);
    let app = hivewatch_api::app::build_app(Arc::new(store.clone()));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .expect("server error");

    store.close().await;
    tracing::info!("connection pool closed");
}
