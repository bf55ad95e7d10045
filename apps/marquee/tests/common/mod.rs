//! Test infrastructure for marquee integration tests.
//!
//! Spins up mock upstreams (catalog API and first-party backend) as axum
//! routers on ephemeral ports, recording every request so tests can assert
//! on paths, query parameters, auth headers, and bodies.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use marquee::auth::TokenProvider;
use marquee::config::{BackendConfig, CatalogConfig};
use marquee::services::{BackendClient, CatalogClient};

/// Image base URL injected into catalog clients under test.
pub const TEST_IMAGE_BASE: &str = "https://img.test/t/p";

/// One request observed by a mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Request path with parameters decoded (e.g. `/movies/abc id`).
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// How a mock endpoint answers.
#[derive(Debug, Clone)]
pub enum PageResponse {
    /// Respond with this many generated movie entries.
    Items(usize),
    /// Respond with this HTTP status and a plain-text body.
    Error(u16),
}

/// Serve a router on an ephemeral port, returning its base URL.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock listener");
    let addr = listener.local_addr().expect("Failed to read mock address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });
    format!("http://{}", addr)
}

fn record(
    requests: &Mutex<Vec<Recorded>>,
    path: String,
    query: &HashMap<String, String>,
    headers: &HeaderMap,
    body: Option<Value>,
) {
    requests.lock().unwrap().push(Recorded {
        path,
        query: query.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });
}

// =============================================================================
// Catalog mock
// =============================================================================

/// Configurable behavior for [`MockCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogBehavior {
    /// Per-page overrides for `/movie/popular`; unlisted pages return a full
    /// page of 20 entries.
    pub popular_pages: HashMap<u32, PageResponse>,
    pub top_rated: PageResponse,
    pub search: PageResponse,
}

impl Default for CatalogBehavior {
    fn default() -> Self {
        Self {
            popular_pages: HashMap::new(),
            top_rated: PageResponse::Items(20),
            search: PageResponse::Items(2),
        }
    }
}

struct CatalogState {
    behavior: CatalogBehavior,
    requests: Mutex<Vec<Recorded>>,
}

/// Mock catalog API server.
pub struct MockCatalog {
    pub base_url: String,
    state: Arc<CatalogState>,
}

impl MockCatalog {
    pub async fn spawn(behavior: CatalogBehavior) -> Self {
        let state = Arc::new(CatalogState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/search/movie", get(catalog_search))
            .route("/movie/popular", get(catalog_popular))
            .route("/movie/top_rated", get(catalog_top_rated))
            .route("/movie/:id", get(catalog_details))
            .with_state(Arc::clone(&state));
        let base_url = serve(app).await;
        Self { base_url, state }
    }

    /// Build a catalog client pointed at this mock.
    pub fn client(&self, api_key: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            api_key: Some(api_key.to_string()),
            base_url: self.base_url.clone(),
            image_base_url: TEST_IMAGE_BASE.to_string(),
        })
        .expect("Failed to create catalog client")
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

/// Generate a raw catalog movie entry with deterministic fields.
pub fn catalog_entry(seed: i64) -> Value {
    json!({
        "id": seed,
        "title": format!("Movie {}", seed),
        "release_date": "2021-06-15",
        "poster_path": format!("/p{}.jpg", seed),
        "backdrop_path": format!("/b{}.jpg", seed),
        "vote_average": 7.5,
        "vote_count": 100,
        "overview": format!("Overview {}", seed),
    })
}

fn page_body(page: u32, count: usize, seed_base: i64, total_results: u64) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| catalog_entry(seed_base + i as i64))
        .collect();
    json!({
        "page": page,
        "results": results,
        "total_pages": 500,
        "total_results": total_results,
    })
}

fn page_response(behavior: &PageResponse, page: u32, seed_base: i64, total_results: u64) -> Response {
    match behavior {
        PageResponse::Items(count) => {
            Json(page_body(page, *count, seed_base, total_results)).into_response()
        }
        PageResponse::Error(status) => (
            StatusCode::from_u16(*status).expect("invalid mock status"),
            "upstream failure",
        )
            .into_response(),
    }
}

async fn catalog_popular(
    State(state): State<Arc<CatalogState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(
        &state.requests,
        "/movie/popular".to_string(),
        &query,
        &headers,
        None,
    );
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let behavior = state
        .behavior
        .popular_pages
        .get(&page)
        .cloned()
        .unwrap_or(PageResponse::Items(20));
    page_response(&behavior, page, (page as i64) * 1000, 10_000)
}

async fn catalog_top_rated(
    State(state): State<Arc<CatalogState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(
        &state.requests,
        "/movie/top_rated".to_string(),
        &query,
        &headers,
        None,
    );
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    page_response(&state.behavior.top_rated, page, 9000, 8000)
}

async fn catalog_search(
    State(state): State<Arc<CatalogState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(
        &state.requests,
        "/search/movie".to_string(),
        &query,
        &headers,
        None,
    );
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    page_response(&state.behavior.search, page, 1, 42)
}

async fn catalog_details(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(
        &state.requests,
        format!("/movie/{}", id),
        &query,
        &headers,
        None,
    );
    let seed: i64 = id.parse().unwrap_or(0);
    Json(catalog_entry(seed)).into_response()
}

// =============================================================================
// First-party backend mock
// =============================================================================

/// Configurable behavior for [`MockBackend`].
#[derive(Debug, Clone, Default)]
pub struct BackendBehavior {
    /// When set, every route fails with this status and a JSON error body.
    pub fail_json: Option<u16>,
    /// When set, every route fails with this status and a plain-text body.
    pub fail_text: Option<u16>,
}

struct BackendState {
    behavior: BackendBehavior,
    requests: Mutex<Vec<Recorded>>,
}

/// Mock first-party backend server.
pub struct MockBackend {
    pub base_url: String,
    state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn spawn(behavior: BackendBehavior) -> Self {
        let state = Arc::new(BackendState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/movies", post(backend_create))
            .route("/movies/top", get(backend_top))
            .route(
                "/movies/:id",
                get(backend_get).put(backend_update).delete(backend_delete),
            )
            .route("/movies/:id/ratings", post(backend_rate))
            .with_state(Arc::clone(&state));
        let base_url = serve(app).await;
        Self { base_url, state }
    }

    /// Build a backend client pointed at this mock.
    pub fn client(&self, tokens: Arc<dyn TokenProvider>) -> BackendClient {
        BackendClient::new(
            &BackendConfig {
                base_url: self.base_url.clone(),
            },
            tokens,
        )
        .expect("Failed to create backend client")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.state
            .requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

fn failure(behavior: &BackendBehavior) -> Option<Response> {
    if let Some(status) = behavior.fail_json {
        return Some(
            (
                StatusCode::from_u16(status).expect("invalid mock status"),
                Json(json!({"error": "request_failed", "message": "movie missing"})),
            )
                .into_response(),
        );
    }
    if let Some(status) = behavior.fail_text {
        return Some(
            (
                StatusCode::from_u16(status).expect("invalid mock status"),
                "plain failure",
            )
                .into_response(),
        );
    }
    None
}

async fn backend_get(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(
        &state.requests,
        format!("/movies/{}", id),
        &query,
        &headers,
        None,
    );
    if let Some(response) = failure(&state.behavior) {
        return response;
    }
    Json(json!({"id": id, "title": "Stored Movie"})).into_response()
}

async fn backend_create(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(
        &state.requests,
        "/movies".to_string(),
        &query,
        &headers,
        Some(body.clone()),
    );
    if let Some(response) = failure(&state.behavior) {
        return response;
    }
    (StatusCode::CREATED, Json(json!({"id": "m1", "created": body}))).into_response()
}

async fn backend_update(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(
        &state.requests,
        format!("/movies/{}", id),
        &query,
        &headers,
        Some(body.clone()),
    );
    if let Some(response) = failure(&state.behavior) {
        return response;
    }
    Json(json!({"id": id, "updated": body})).into_response()
}

async fn backend_delete(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(
        &state.requests,
        format!("/movies/{}", id),
        &query,
        &headers,
        None,
    );
    if let Some(response) = failure(&state.behavior) {
        return response;
    }
    Json(json!({"deleted": id})).into_response()
}

async fn backend_rate(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(
        &state.requests,
        format!("/movies/{}/ratings", id),
        &query,
        &headers,
        Some(body.clone()),
    );
    if let Some(response) = failure(&state.behavior) {
        return response;
    }
    Json(json!({"movie_id": id, "score": body["score"]})).into_response()
}

async fn backend_top(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    record(
        &state.requests,
        "/movies/top".to_string(),
        &query,
        &headers,
        None,
    );
    if let Some(response) = failure(&state.behavior) {
        return response;
    }
    Json(json!({"items": [{"id": "m1", "title": "Top Movie"}]})).into_response()
}
