use crate::models::responses::BooksResponse;
use crate::services::filters::FilterSet;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};
use tracing::{error, info};

/// `GET /get_books`. Always answers 200: backend failures are logged and
/// reported as an empty result.
pub async fn get_books(
    State(state): State<AppState>,
    query: Option<Query<Vec<(String, String)>>>,
) -> Json<BooksResponse> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let filters = FilterSet::from_query_pairs(&pairs);
    info!("Book query: {:?}", filters);

    match state.backend.fetch_books(&filters).await {
        Ok(page) => {
            info!(
                "Returning {} of {} matching books",
                page.rows.len(),
                page.total_count
            );
            Json(BooksResponse::from_page(&filters, page))
        }
        Err(e) => {
            error!("Failed to fetch books: {}", e);
            Json(BooksResponse::degraded(filters.per_page))
        }
    }
}
