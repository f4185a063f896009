//! SQL for `/get_books`.
//!
//! Both statements share one WHERE predicate, built from a [`FilterSet`] as a
//! list of clauses that own their parameters. Rendering goes through
//! [`QueryBuilder::push_bind`], so request values only ever travel as bound
//! parameters.

use crate::services::filters::FilterSet;
use crate::utils::text::contains_pattern;
use sqlx::{Postgres, QueryBuilder};

const FROM_JOINS: &str = r#"
        FROM books_book AS bb
        LEFT JOIN books_book_authors AS bba ON bba.book_id = bb.gutenberg_id
        LEFT JOIN books_author AS ba ON ba.id = bba.author_id
        LEFT JOIN books_book_languages AS bbl ON bbl.book_id = bb.gutenberg_id
        LEFT JOIN books_language AS bl ON bl.id = bbl.language_id
        LEFT JOIN books_book_subjects AS bbs ON bbs.book_id = bb.gutenberg_id
        LEFT JOIN books_subject AS bs ON bs.id = bbs.subject_id
        LEFT JOIN books_book_bookshelves AS bbb ON bbb.book_id = bb.gutenberg_id
        LEFT JOIN books_bookshelf AS bbk ON bbk.id = bbb.bookshelf_id
        LEFT JOIN books_format AS bf ON bf.book_id = bb.gutenberg_id
"#;

const SELECT_COUNT: &str = "SELECT COUNT(DISTINCT bb.gutenberg_id) AS total_count";

// The author with the lowest id among the rows left after filtering stands in
// for the whole book; the same goes for the language code.
const SELECT_BOOKS: &str = r#"
        SELECT
            bb.gutenberg_id::int4 AS gutenberg_id,
            bb.title,
            bb.download_count::int4 AS download_count,
            (ARRAY_AGG(
                jsonb_build_object(
                    'name', ba.name,
                    'birth_year', ba.birth_year,
                    'death_year', ba.death_year,
                    'id', ba.id
                ) ORDER BY ba.id
            ) FILTER (WHERE ba.id IS NOT NULL))[1] AS author,
            MIN(bl.code) AS language,
            STRING_AGG(DISTINCT bs.name, ', ') AS subjects,
            STRING_AGG(DISTINCT bbk.name, ', ') AS bookshelves,
            COALESCE(
                jsonb_agg(
                    DISTINCT jsonb_build_object('mime_type', bf.mime_type, 'url', bf.url)
                ) FILTER (WHERE bf.book_id IS NOT NULL),
                '[]'::jsonb
            ) AS download_links"#;

const GROUP_BY: &str = " GROUP BY bb.gutenberg_id, bb.title, bb.download_count";

const ORDER_BY: &str = " ORDER BY bb.download_count DESC NULLS LAST, bb.gutenberg_id ASC";

/// One conjunct of the WHERE predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `column = ANY($n)` over an integer array.
    IntIn {
        column: &'static str,
        values: Vec<i64>,
    },
    /// `column = ANY($n)` over a text array.
    TextIn {
        column: &'static str,
        values: Vec<String>,
    },
    /// Matches when any pattern matches any of the columns (`ILIKE`).
    AnyLike {
        columns: &'static [&'static str],
        patterns: Vec<String>,
    },
}

impl Clause {
    fn push_to(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Clause::IntIn { column, values } => {
                builder.push(*column).push(" = ANY(");
                builder.push_bind(values.clone()).push(")");
            }
            Clause::TextIn { column, values } => {
                builder.push(*column).push(" = ANY(");
                builder.push_bind(values.clone()).push(")");
            }
            Clause::AnyLike { columns, patterns } => {
                builder.push("(");
                for (i, pattern) in patterns.iter().enumerate() {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    builder.push("(");
                    for (j, column) in columns.iter().enumerate() {
                        if j > 0 {
                            builder.push(" OR ");
                        }
                        builder.push(*column).push(" ILIKE ");
                        builder.push_bind(pattern.clone());
                    }
                    builder.push(")");
                }
                builder.push(")");
            }
        }
    }
}

/// Conjunction of [`Clause`]s. Empty means every book matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn from_filters(filters: &FilterSet) -> Self {
        let mut predicate = Predicate::default();

        if !filters.book_ids.is_empty() {
            predicate.and(Clause::IntIn {
                column: "bb.gutenberg_id",
                values: filters.book_ids.clone(),
            });
        }
        if !filters.languages.is_empty() {
            predicate.and(Clause::TextIn {
                column: "bl.code",
                values: filters.languages.clone(),
            });
        }
        if !filters.mime_types.is_empty() {
            predicate.and(Clause::TextIn {
                column: "bf.mime_type",
                values: filters.mime_types.clone(),
            });
        }
        predicate.and_any_like(&["bs.name", "bbk.name"], &filters.topics);
        predicate.and_any_like(&["ba.name"], &filters.authors);
        predicate.and_any_like(&["bb.title"], &filters.titles);

        predicate
    }

    fn and(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    fn and_any_like(&mut self, columns: &'static [&'static str], terms: &[String]) {
        if terms.is_empty() {
            return;
        }
        self.and(Clause::AnyLike {
            columns,
            patterns: terms.iter().map(|term| contains_pattern(term)).collect(),
        });
    }

    /// Appends ` WHERE ...` unless the predicate is empty.
    pub fn push_where(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        for (i, clause) in self.clauses.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            clause.push_to(builder);
        }
    }
}

/// The count and data statements for one request.
#[derive(Debug, Clone)]
pub struct BookQuery {
    predicate: Predicate,
    limit: i64,
    offset: i64,
}

impl BookQuery {
    pub fn new(filters: &FilterSet) -> Self {
        Self {
            predicate: Predicate::from_filters(filters),
            limit: i64::try_from(filters.per_page).unwrap_or(i64::MAX),
            offset: i64::try_from(filters.offset()).unwrap_or(i64::MAX),
        }
    }

    /// `COUNT(DISTINCT gutenberg_id)` over the filtered join, unpaginated.
    pub fn count_statement(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(SELECT_COUNT);
        builder.push(FROM_JOINS);
        self.predicate.push_where(&mut builder);
        builder
    }

    /// One aggregated row per book for the requested page.
    pub fn data_statement(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(SELECT_BOOKS);
        builder.push(FROM_JOINS);
        self.predicate.push_where(&mut builder);
        builder.push(GROUP_BY);
        builder.push(ORDER_BY);
        builder.push(" LIMIT ").push_bind(self.limit);
        builder.push(" OFFSET ").push_bind(self.offset);
        builder
    }
}
