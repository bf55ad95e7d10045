//! First-party backend client.
//!
//! Thin CRUD and ratings wrapper over the application's own REST service.
//! Every operation is a direct request/response pass-through; errors
//! propagate to the caller untouched.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenProvider;
use crate::config::BackendConfig;
use crate::error::{AppError, ErrorBody, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A rating submission for a movie.
#[derive(Debug, Clone, Serialize)]
pub struct RatingInput {
    pub score: f64,
    pub review: String,
}

/// Client for the first-party movie backend.
pub struct BackendClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// `tokens` supplies the bearer token attached to each request; requests
    /// go out unauthenticated while it yields `None`.
    pub fn new(config: &BackendConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Fetch a movie by id.
    pub async fn get_movie(&self, movie_id: &str) -> Result<Value> {
        self.execute(self.request(Method::GET, &movie_path(movie_id)))
            .await
    }

    /// Create a movie from the given payload.
    pub async fn create_movie(&self, movie: &Value) -> Result<Value> {
        self.execute(self.request(Method::POST, "/movies").json(movie))
            .await
    }

    /// Replace a movie's data.
    pub async fn update_movie(&self, movie_id: &str, movie: &Value) -> Result<Value> {
        self.execute(self.request(Method::PUT, &movie_path(movie_id)).json(movie))
            .await
    }

    /// Delete a movie by id.
    pub async fn delete_movie(&self, movie_id: &str) -> Result<Value> {
        self.execute(self.request(Method::DELETE, &movie_path(movie_id)))
            .await
    }

    /// Submit a rating for a movie.
    pub async fn submit_rating(&self, movie_id: &str, rating: &RatingInput) -> Result<Value> {
        let path = format!("{}/ratings", movie_path(movie_id));
        self.execute(self.request(Method::POST, &path).json(rating))
            .await
    }

    /// Fetch the top-N ranked movies from the backend.
    pub async fn top_rated(&self, limit: u32) -> Result<Value> {
        self.execute(
            self.request(Method::GET, "/movies/top")
                .query(&[("limit", limit)]),
        )
        .await
    }

    /// Build a request with the default headers and current credentials.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }

        request
    }

    /// Send a request and translate the response.
    ///
    /// Non-success statuses become [`AppError::Api`] with the body parsed as
    /// JSON when the response declares a JSON content type, otherwise kept as
    /// raw text. Successful JSON responses are parsed; anything else comes
    /// back as a string value.
    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        if !status.is_success() {
            let body = if is_json {
                match response.json::<Value>().await {
                    Ok(value) => ErrorBody::Json(value),
                    Err(_) => ErrorBody::Text(String::new()),
                }
            } else {
                ErrorBody::Text(response.text().await.unwrap_or_default())
            };
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if is_json {
            Ok(response.json::<Value>().await?)
        } else {
            Ok(Value::String(response.text().await?))
        }
    }
}

/// Path for a single movie resource, with the id percent-encoded.
fn movie_path(movie_id: &str) -> String {
    format!("/movies/{}", urlencoding::encode(movie_id))
}
