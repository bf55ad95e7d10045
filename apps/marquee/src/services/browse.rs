//! Browse orchestrator.
//!
//! Single entry point deciding, per request, whether to search the catalog or
//! aggregate popular listings, plus the fan-out that assembles the home page
//! sections. Callers always receive the uniform [`MoviePage`]/[`Movie`]
//! shapes and never learn which upstream served the data.

use futures::future::join_all;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Movie, MoviePage};
use crate::services::catalog::CatalogClient;

/// Number of movies fed to the featured carousel.
const FEATURED_COUNT: usize = 6;
/// Items fetched per auxiliary section before truncation (one upstream page).
const SECTION_FETCH_LIMIT: u32 = 20;

/// Parameters for a movie listing request.
#[derive(Debug, Clone)]
pub struct FetchParams {
    /// Search query; empty or whitespace-only routes to popular listings.
    pub query: String,
    pub page: u32,
    pub limit: u32,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            limit: 100,
        }
    }
}

/// Parameters for assembling the home page sections.
#[derive(Debug, Clone)]
pub struct HomeParams {
    /// Starting page for the main grid aggregation.
    pub page: u32,
    /// Number of movies aggregated for the main grid.
    pub limit: u32,
    /// Maximum movies kept per auxiliary section.
    pub section_size: usize,
}

impl Default for HomeParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 60,
            section_size: 6,
        }
    }
}

/// Assembled home page content.
#[derive(Debug, Clone)]
pub struct HomeSections {
    /// Main grid, aggregated popular movies.
    pub main: MoviePage,
    /// Carousel feed: the first few top-rated movies.
    pub featured: Vec<Movie>,
    pub top_rated: Vec<Movie>,
    pub popular: Vec<Movie>,
    pub newly_added: Vec<Movie>,
}

/// Auxiliary home sections fetched independently of the main grid.
#[derive(Debug, Clone, Copy)]
enum Section {
    TopRated,
    Popular,
    NewlyAdded,
}

impl Section {
    fn name(&self) -> &'static str {
        match self {
            Section::TopRated => "top-rated",
            Section::Popular => "popular",
            Section::NewlyAdded => "newly-added",
        }
    }
}

/// Orchestrator for browse and home page queries.
pub struct Browser {
    catalog: Arc<CatalogClient>,
}

impl Browser {
    /// Create a new browser over the given catalog client.
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Fetch a page of movies for a listing or search view.
    ///
    /// A non-empty trimmed query delegates to catalog search (single page,
    /// no aggregation); an empty one aggregates popular movies up to
    /// `limit`. Either way the result is a uniform [`MoviePage`].
    pub async fn fetch_movies(&self, params: &FetchParams) -> Result<MoviePage> {
        if !params.query.trim().is_empty() {
            self.catalog.search_movies(&params.query, params.page).await
        } else {
            self.catalog.popular(params.page, params.limit).await
        }
    }

    /// Assemble the home page sections.
    ///
    /// The main grid aggregation runs first and its failure propagates. The
    /// three auxiliary fetches are issued concurrently and joined once; each
    /// failure downgrades to an empty section so one flaky upstream page
    /// never blanks the rest of the home page.
    pub async fn home_sections(&self, params: &HomeParams) -> Result<HomeSections> {
        let main = self.catalog.popular(params.page, params.limit).await?;

        let sections = [Section::TopRated, Section::Popular, Section::NewlyAdded];
        let fetches: Vec<_> = sections
            .iter()
            .map(|section| async move {
                let result = match section {
                    Section::TopRated => self.catalog.top_rated(1).await,
                    Section::Popular => self.catalog.popular(1, SECTION_FETCH_LIMIT).await,
                    Section::NewlyAdded => self.catalog.popular(2, SECTION_FETCH_LIMIT).await,
                };
                match result {
                    Ok(page) => page.movies,
                    Err(e) => {
                        tracing::warn!(
                            section = section.name(),
                            error = %e,
                            "Home section fetch failed"
                        );
                        Vec::new()
                    }
                }
            })
            .collect();

        let mut results = join_all(fetches).await;
        let newly_added = results.pop().unwrap_or_default();
        let popular = results.pop().unwrap_or_default();
        let top_rated = results.pop().unwrap_or_default();

        let featured = top_rated.iter().take(FEATURED_COUNT).cloned().collect();

        Ok(HomeSections {
            main,
            featured,
            top_rated: truncate(top_rated, params.section_size),
            popular: truncate(popular, params.section_size),
            newly_added: truncate(newly_added, params.section_size),
        })
    }
}

fn truncate(mut movies: Vec<Movie>, len: usize) -> Vec<Movie> {
    movies.truncate(len);
    movies
}
