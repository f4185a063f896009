use crate::AppState;
use axum::{extract::State, http::StatusCode};
use tracing::error;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if !state.database_configured {
        return (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_URL not found");
    }

    match state.backend.test_connection().await {
        Ok(()) => (StatusCode::OK, "Database connection successful!"),
        Err(e) => {
            error!("Health check failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database connection failed")
        }
    }
}
