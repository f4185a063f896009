use crate::models::catalog::{AuthorRecord, BookRow, DownloadLink, ResultPage};
use crate::services::filters::FilterSet;
use crate::utils::text::split_aggregate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResult {
    pub title: Option<String>,
    pub gutenberg_id: i32,
    pub author: AuthorRecord,
    pub language: Option<String>,
    pub subjects: Vec<String>,
    pub bookshelves: Vec<String>,
    pub download_links: Vec<DownloadLink>,
}

impl From<BookRow> for BookResult {
    fn from(row: BookRow) -> Self {
        Self {
            title: row.title,
            gutenberg_id: row.gutenberg_id,
            author: row.author.map(|author| author.0).unwrap_or_default(),
            language: row.language,
            subjects: split_aggregate(row.subjects.as_deref()),
            bookshelves: split_aggregate(row.bookshelves.as_deref()),
            download_links: row.download_links.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFilters {
    pub book_ids: Option<Vec<i64>>,
    pub languages: Option<Vec<String>>,
    pub mime_types: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub authors: Option<Vec<String>>,
    pub titles: Option<Vec<String>>,
}

/// Echo of the normalized filters. Serializes as `{}` on the degraded path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FiltersApplied {
    Active(ActiveFilters),
    Empty {},
}

impl From<&FilterSet> for FiltersApplied {
    fn from(filters: &FilterSet) -> Self {
        fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
            if values.is_empty() {
                None
            } else {
                Some(values.to_vec())
            }
        }

        FiltersApplied::Active(ActiveFilters {
            book_ids: non_empty(&filters.book_ids),
            languages: non_empty(&filters.languages),
            mime_types: non_empty(&filters.mime_types),
            topics: non_empty(&filters.topics),
            authors: non_empty(&filters.authors),
            titles: non_empty(&filters.titles),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(per_page.max(1));
        let has_next = page < total_pages;
        let has_prev = page > 1;

        Self {
            page,
            per_page,
            total_pages,
            has_next,
            has_prev,
            next_page: has_next.then(|| page + 1),
            prev_page: has_prev.then(|| page - 1),
        }
    }

    /// Pagination reported when the backend failed: first page, nothing else.
    pub fn degraded(per_page: u64) -> Self {
        Self::new(1, per_page, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksResponse {
    pub total_books: u64,
    pub books: Vec<BookResult>,
    pub filters_applied: FiltersApplied,
    pub pagination: Pagination,
}

impl BooksResponse {
    pub fn from_page(filters: &FilterSet, page: ResultPage) -> Self {
        Self {
            total_books: page.total_count,
            books: page.rows.into_iter().map(BookResult::from).collect(),
            filters_applied: FiltersApplied::from(filters),
            pagination: Pagination::new(filters.page, filters.per_page, page.total_count),
        }
    }

    pub fn degraded(per_page: u64) -> Self {
        Self {
            total_books: 0,
            books: Vec::new(),
            filters_applied: FiltersApplied::Empty {},
            pagination: Pagination::degraded(per_page),
        }
    }
}
