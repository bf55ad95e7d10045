//! Normalized movie domain model.
//!
//! Every data source (first-party backend, external catalog) is mapped into
//! these shapes before results reach a caller, so downstream consumers never
//! see source-specific record layouts.

use serde::Serialize;

/// A normalized movie record.
///
/// Immutable value object built fresh on every fetch; there is no caching or
/// identity beyond the request that produced it. Rating fields default to
/// `None`/`0` rather than being absent, so renderers need no existence checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    /// Globally unique id, prefixed by source (`tmdb_<id>` for catalog
    /// records, opaque otherwise).
    pub id: String,
    /// Display title, empty string when the source has none.
    pub title: String,
    /// Four-digit release year derived from the source date, or empty.
    pub year: String,
    /// Fully qualified poster URL, never a relative path.
    pub poster: Option<String>,
    /// Average rating on the source's native scale (0-10 for the catalog).
    pub avg_rating: Option<f64>,
    /// Number of ratings behind `avg_rating`.
    pub rating_count: u32,
    /// Plot summary, empty string when the source has none.
    pub description: String,
}

/// One page of normalized movie results.
///
/// `total` semantics depend on the operation that produced the page: search
/// and top-rated report the upstream's total match count, while aggregated
/// popular fetches report the number of movies actually collected. Callers
/// must not compare totals across call types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub page: u32,
    pub total: u64,
    /// Upstream-reported page count, when the operation exposes one.
    pub total_pages: Option<u32>,
}

impl MoviePage {
    /// An empty result page, used for soft-fail paths like empty queries.
    pub fn empty() -> Self {
        Self {
            movies: Vec::new(),
            page: 1,
            total: 0,
            total_pages: Some(0),
        }
    }
}
