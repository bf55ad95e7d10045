//! External movie catalog (TMDB) adapter.
//!
//! Maps the catalog's record shapes into the normalized [`Movie`] model and
//! assembles bounded result sets from an upstream that only returns
//! fixed-size pages.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::config::CatalogConfig;
use crate::error::{AppError, Result};
use crate::model::{Movie, MoviePage};

/// Fixed number of results per upstream page.
const PAGE_SIZE: usize = 20;
/// Upstream refuses page numbers above this, so aggregation stops there.
const MAX_PAGE: u32 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 30;

const POSTER_SIZE: &str = "w342";
const BACKDROP_SIZE: &str = "w780";

/// Catalog API client for fetching movie metadata.
pub struct CatalogClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client from its configuration.
    ///
    /// Returns an error if no API key is configured or if the HTTP client
    /// cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Internal("Catalog API key cannot be empty".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.clone(),
            image_base_url: config.image_base_url.clone(),
        })
    }

    /// Whether the configured key is sent as an `Authorization: Bearer`
    /// header rather than an `api_key` query parameter.
    ///
    /// TMDB read access tokens are JWTs, which always start with `eyJ`
    /// (base64 of `{"`); legacy v3 keys are plain hex strings.
    pub fn uses_bearer_auth(&self) -> bool {
        self.api_key.starts_with("eyJ")
    }

    /// Search for movies by title.
    ///
    /// An empty or whitespace-only query is a soft failure: it returns an
    /// empty page without issuing a request.
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        if query.trim().is_empty() {
            return Ok(MoviePage::empty());
        }

        tracing::debug!(query = %query, page, "Searching catalog movies");

        let params = [
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("include_adult", "false".to_string()),
        ];
        let data: CatalogPage = self.get_json("/search/movie", &params).await?;

        Ok(MoviePage {
            movies: data.results.iter().map(|e| self.map_entry(e)).collect(),
            page: data.page,
            total: data.total_results,
            total_pages: Some(data.total_pages),
        })
    }

    /// Fetch a single movie with its extended sub-resources, normalized.
    pub async fn movie_details(&self, id: &str) -> Result<Movie> {
        tracing::debug!(movie_id = %id, "Fetching catalog movie details");

        let params = [("append_to_response", "videos,images".to_string())];
        let entry: CatalogEntry = self
            .get_json(&format!("/movie/{}", urlencoding::encode(id)), &params)
            .await?;

        Ok(self.map_entry(&entry))
    }

    /// Fetch popular movies, aggregating fixed-size upstream pages until
    /// `limit` items are collected.
    ///
    /// Fetching stops when the limit is reached, when a short page signals
    /// the upstream ran out of results, or at the upstream's page cap. The
    /// final page's contribution is truncated so at most `limit` items
    /// return; `total` is the collected count, not an upstream figure.
    ///
    /// A page failure mid-aggregation preserves whatever was already
    /// collected; only a failure on the very first page is an error.
    pub async fn popular(&self, page: u32, limit: u32) -> Result<MoviePage> {
        let mut movies: Vec<Movie> = Vec::new();
        let mut current_page = page.max(1);

        while (movies.len() as u32) < limit && current_page <= MAX_PAGE {
            let params = [("page", current_page.to_string())];
            let data: CatalogPage = match self.get_json("/movie/popular", &params).await {
                Ok(data) => data,
                Err(e) if !movies.is_empty() => {
                    tracing::warn!(
                        page = current_page,
                        error = %e,
                        "Popular page fetch failed mid-aggregation, keeping partial results"
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            let fetched = data.results.len();
            let remaining = limit as usize - movies.len();
            movies.extend(data.results.iter().take(remaining).map(|e| self.map_entry(e)));

            if fetched < PAGE_SIZE {
                // Short page: upstream has no further results
                break;
            }
            current_page += 1;
        }

        let total = movies.len() as u64;
        Ok(MoviePage {
            movies,
            page,
            total,
            total_pages: None,
        })
    }

    /// Fetch one page of top-rated movies.
    ///
    /// No aggregation: `total` is the upstream-reported match count.
    pub async fn top_rated(&self, page: u32) -> Result<MoviePage> {
        tracing::debug!(page, "Fetching catalog top-rated movies");

        let params = [("page", page.to_string())];
        let data: CatalogPage = self.get_json("/movie/top_rated", &params).await?;

        Ok(MoviePage {
            movies: data.results.iter().map(|e| self.map_entry(e)).collect(),
            page: data.page,
            total: data.total_results,
            total_pages: None,
        })
    }

    /// Build a fully qualified image URL for the given path and size.
    ///
    /// Common sizes: "w92", "w154", "w185", "w342", "w500", "w780", "original"
    pub fn image_url(&self, path: &str, size: &str) -> String {
        format!("{}/{}{}", self.image_base_url, size, path)
    }

    /// Normalize one raw catalog entry into the local movie model.
    ///
    /// Total and deterministic: absent fields degrade to empty strings,
    /// `None`, or zero; a zero vote average counts as unrated.
    fn map_entry(&self, entry: &CatalogEntry) -> Movie {
        let date = entry
            .release_date
            .as_deref()
            .or(entry.first_air_date.as_deref())
            .unwrap_or("");

        let poster = match (&entry.poster_path, &entry.backdrop_path) {
            (Some(poster), _) => Some(self.image_url(poster, POSTER_SIZE)),
            (None, Some(backdrop)) => Some(self.image_url(backdrop, BACKDROP_SIZE)),
            (None, None) => None,
        };

        Movie {
            id: format!("tmdb_{}", entry.id),
            title: entry
                .title
                .clone()
                .or_else(|| entry.name.clone())
                .unwrap_or_default(),
            year: date.chars().take(4).collect(),
            poster,
            avg_rating: entry.vote_average.filter(|v| *v != 0.0),
            rating_count: entry.vote_count.unwrap_or(0),
            description: entry.overview.clone().unwrap_or_default(),
        }
    }

    /// Internal helper to perform GET requests with query parameters and
    /// deserialize JSON responses, attaching the configured credentials.
    async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url);
        if self.uses_bearer_auth() {
            request = request.bearer_auth(&self.api_key);
        } else {
            request = request.query(&[("api_key", self.api_key.as_str())]);
        }

        let response = request.query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Catalog {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Paged list response from the catalog API.
#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    results: Vec<CatalogEntry>,
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

fn first_page() -> u32 {
    1
}

/// Raw movie entry from the catalog API.
///
/// TV-originated records use `name`/`first_air_date` instead of
/// `title`/`release_date`; both shapes normalize through
/// [`CatalogClient::map_entry`].
#[derive(Debug, Default, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    id: i64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u32>,
    overview: Option<String>,
}
