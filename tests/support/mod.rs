#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use catalog_service::models::catalog::{
    AuthorRecord, BookRow, CatalogBackend, CatalogError, DownloadLink, ResultPage,
};
use catalog_service::services::filters::FilterSet;
use catalog_service::{app, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::types::Json;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// In-memory backend returning a canned page or failing on demand.
pub struct FakeBackend {
    pub page: Option<ResultPage>,
    pub requests: Mutex<Vec<FilterSet>>,
}

impl FakeBackend {
    pub fn returning(total_count: u64, rows: Vec<BookRow>) -> Self {
        Self {
            page: Some(ResultPage { total_count, rows }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            page: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> FilterSet {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("backend was not called")
    }
}

#[async_trait]
impl CatalogBackend for FakeBackend {
    async fn fetch_books(&self, filters: &FilterSet) -> Result<ResultPage, CatalogError> {
        self.requests.lock().unwrap().push(filters.clone());
        self.page
            .clone()
            .ok_or(CatalogError::Postgres(sqlx::Error::PoolTimedOut))
    }

    async fn test_connection(&self) -> Result<(), CatalogError> {
        match self.page {
            Some(_) => Ok(()),
            None => Err(CatalogError::Postgres(sqlx::Error::PoolTimedOut)),
        }
    }
}

pub fn router(backend: Arc<FakeBackend>, database_configured: bool) -> Router {
    app(AppState {
        backend,
        database_configured,
    })
}

pub async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(router, uri).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!("Failed to parse JSON: {}", String::from_utf8_lossy(&body));
    });
    (status, json)
}

pub fn sample_book() -> BookRow {
    BookRow {
        gutenberg_id: 1,
        title: Some("Sample Book".to_string()),
        download_count: Some(1000),
        author: Some(Json(AuthorRecord {
            name: Some("Test Author".to_string()),
            birth_year: Some(1800),
            death_year: Some(1880),
            id: Some(1),
        })),
        language: Some("en".to_string()),
        subjects: Some("Fiction, Drama".to_string()),
        bookshelves: Some("Classic Literature".to_string()),
        download_links: Json(vec![DownloadLink {
            mime_type: Some("text/plain".to_string()),
            url: Some("http://example.com/book.txt".to_string()),
        }]),
    }
}
