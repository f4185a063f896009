use catalog_service::config::{Config, DEFAULT_LOG_FILTER};
use catalog_service::models::catalog::PostgresBackend;
use catalog_service::{app, AppState, Backend};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if !config.has_database_url() {
        warn!("DATABASE_URL not set, falling back to the local database");
    }

    let backend: Backend =
        match PostgresBackend::new(config.effective_database_url(), config.max_connections) {
            Ok(backend) => Arc::new(backend),
            Err(e) => {
                error!("Failed to set up PostgreSQL pool: {}", e);
                std::process::exit(1);
            }
        };

    let state = AppState {
        backend,
        database_configured: config.has_database_url(),
    };

    let addr = config.bind_addr();
    info!("Catalog service starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app(state)).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
