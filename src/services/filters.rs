use crate::utils::text::split_terms;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 25;
pub const MAX_PER_PAGE: u64 = 100;

/// Normalized `/get_books` request. An empty list means the filter is not
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub page: u64,
    pub per_page: u64,
    pub book_ids: Vec<i64>,
    pub languages: Vec<String>,
    pub mime_types: Vec<String>,
    pub topics: Vec<String>,
    pub authors: Vec<String>,
    pub titles: Vec<String>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            book_ids: Vec::new(),
            languages: Vec::new(),
            mime_types: Vec::new(),
            topics: Vec::new(),
            authors: Vec::new(),
            titles: Vec::new(),
        }
    }
}

impl FilterSet {
    /// Builds a filter set from raw query pairs. Never fails: anything that
    /// cannot be interpreted falls back to the default for that field.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let page = first_int(pairs, "page").unwrap_or(DEFAULT_PAGE as i64);
        let per_page = first_int(pairs, "per_page").unwrap_or(DEFAULT_PER_PAGE as i64);

        let book_ids = split_terms(values_of(pairs, "book_id"))
            .iter()
            .filter_map(|id| parse_int(id))
            .collect();

        Self {
            page: normalize_page(page),
            per_page: normalize_per_page(per_page),
            book_ids,
            languages: split_terms(values_of(pairs, "language")),
            mime_types: split_terms(values_of(pairs, "mime_type")),
            topics: split_terms(values_of(pairs, "topic")),
            authors: split_terms(values_of(pairs, "author")),
            titles: split_terms(values_of(pairs, "title")),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    #[cfg(test)]
    fn is_unfiltered(&self) -> bool {
        self.book_ids.is_empty()
            && self.languages.is_empty()
            && self.mime_types.is_empty()
            && self.topics.is_empty()
            && self.authors.is_empty()
            && self.titles.is_empty()
    }
}

fn values_of<'a>(
    pairs: &'a [(String, String)],
    key: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    pairs
        .iter()
        .filter(move |(k, _)| k.as_str() == key)
        .map(|(_, v)| v.as_str())
}

// Repeated scalars: the first occurrence wins.
fn first_int(pairs: &[(String, String)], key: &str) -> Option<i64> {
    values_of(pairs, key).next().and_then(parse_int)
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn normalize_page(page: i64) -> u64 {
    page.max(1) as u64
}

fn normalize_per_page(per_page: i64) -> u64 {
    per_page.clamp(1, MAX_PER_PAGE as i64) as u64
}
