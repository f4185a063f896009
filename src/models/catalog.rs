use crate::services::filters::FilterSet;
use crate::services::query::BookQuery;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("Negative book count reported: {0}")]
    InvalidCount(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: Option<String>,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub mime_type: Option<String>,
    pub url: Option<String>,
}

/// One book as aggregated by the data statement.
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub gutenberg_id: i32,
    pub title: Option<String>,
    pub download_count: Option<i32>,
    pub author: Option<Json<AuthorRecord>>,
    pub language: Option<String>,
    pub subjects: Option<String>,
    pub bookshelves: Option<String>,
    pub download_links: Json<Vec<DownloadLink>>,
}

#[derive(Debug, Clone, Default)]
pub struct ResultPage {
    pub total_count: u64,
    pub rows: Vec<BookRow>,
}

#[async_trait]
pub trait CatalogBackend {
    async fn fetch_books(&self, filters: &FilterSet) -> Result<ResultPage, CatalogError>;
    async fn test_connection(&self) -> Result<(), CatalogError>;
}

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Creates the pool without connecting, so the service comes up even when
    /// the database does not.
    pub fn new(database_url: &str, max_connections: u32) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)?;

        Ok(Self::with_pool(pool))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogBackend for PostgresBackend {
    async fn fetch_books(&self, filters: &FilterSet) -> Result<ResultPage, CatalogError> {
        let query = BookQuery::new(filters);

        // Both statements run on the same connection; it goes back to the
        // pool when `conn` drops, whichever way this function returns.
        let mut conn = self.pool.acquire().await?;

        let mut count_statement = query.count_statement();
        let total_count: i64 = count_statement
            .build_query_scalar()
            .fetch_one(&mut *conn)
            .await?;
        let total_count =
            u64::try_from(total_count).map_err(|_| CatalogError::InvalidCount(total_count))?;

        let mut data_statement = query.data_statement();
        let rows: Vec<BookRow> = data_statement
            .build_query_as()
            .fetch_all(&mut *conn)
            .await?;

        debug!(
            "Fetched {} of {} matching books (page {}, per_page {})",
            rows.len(),
            total_count,
            filters.page,
            filters.per_page
        );

        Ok(ResultPage { total_count, rows })
    }

    async fn test_connection(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
