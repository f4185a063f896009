mod support;

use axum::http::StatusCode;
use std::sync::Arc;
use support::{get, router, FakeBackend};

#[tokio::test]
async fn missing_database_url_is_reported() {
    let backend = Arc::new(FakeBackend::returning(0, Vec::new()));
    let (status, body) = get(router(backend, false), "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"DATABASE_URL not found");
}

#[tokio::test]
async fn reachable_database_is_healthy() {
    let backend = Arc::new(FakeBackend::returning(0, Vec::new()));
    let (status, body) = get(router(backend, true), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Database connection successful!");
}

#[tokio::test]
async fn unreachable_database_fails_health_check() {
    let backend = Arc::new(FakeBackend::failing());
    let (status, body) = get(router(backend, true), "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Database connection failed");
}

#[tokio::test]
async fn get_books_stays_available_without_database_url() {
    let backend = Arc::new(FakeBackend::failing());
    let (status, _) = get(router(backend, false), "/get_books").await;

    assert_eq!(status, StatusCode::OK);
}
