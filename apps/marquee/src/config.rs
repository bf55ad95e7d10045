//! Configuration module for marquee.
//!
//! Loads configuration from `config.toml` with environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// First-party backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the first-party REST backend.
    #[serde(default = "default_backend_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_base_url(),
        }
    }
}

fn default_backend_base_url() -> String {
    "http://localhost:8080".to_string()
}

/// External movie catalog (TMDB) configuration.
///
/// Each [`CatalogClient`](crate::services::CatalogClient) is constructed from
/// its own copy of this struct; there is no process-wide key state, so tests
/// can run with distinct configurations concurrently.
#[derive(Clone, Deserialize)]
pub struct CatalogConfig {
    /// TMDB API key. Keys shaped like a JWT read access token (`eyJ…`) are
    /// sent as a bearer header, anything else as an `api_key` query parameter.
    pub api_key: Option<String>,
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
        }
    }
}

// Custom Debug implementation to avoid exposing api_key
impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .finish()
    }
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` in current directory (optional)
    /// 3. Environment variables with `MARQUEE_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `MARQUEE_CATALOG__API_KEY=abc` sets `catalog.api_key`
    /// - `MARQUEE_BACKEND__BASE_URL=https://movies.example` sets `backend.base_url`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            // Start with defaults
            .set_default("backend.base_url", default_backend_base_url())?
            .set_default("catalog.base_url", default_catalog_base_url())?
            .set_default("catalog.image_base_url", default_image_base_url())?
            // Add config file (optional)
            .add_source(File::with_name(config_path).required(false))
            // Override with environment variables
            // MARQUEE_CATALOG__API_KEY=abc -> catalog.api_key = "abc"
            .add_source(
                Environment::with_prefix("MARQUEE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        config.validate();

        Ok(config)
    }

    /// Warn about missing fields that will limit functionality.
    fn validate(&self) {
        if self.catalog.api_key.is_none() {
            tracing::warn!("Catalog API key not configured - movie metadata lookups will fail");
        }
    }
}
