use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use models::catalog::CatalogBackend;
use routes::{books::get_books, health::health_check};

pub type Backend = Arc<dyn CatalogBackend + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    /// Whether `DATABASE_URL` was set; the health check reports 500 if not.
    pub database_configured: bool,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/get_books", get(get_books))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
