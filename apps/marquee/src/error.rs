//! Application error types for marquee.
//!
//! Provides a unified error type shared by the first-party backend client,
//! the catalog adapter, and the browse orchestrator.

use serde_json::Value;
use thiserror::Error;

/// Body of a non-success first-party backend response.
///
/// The backend declares its error bodies as JSON, but not every intermediary
/// does (proxies, gateways), so the raw text is preserved when the response
/// is not JSON-typed.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
}

impl ErrorBody {
    /// Get the parsed JSON body, if this error body was JSON-typed.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ErrorBody::Json(value) => Some(value),
            ErrorBody::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{}", value),
            ErrorBody::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Network-level failure: no response, connection error, or a body that
    /// could not be read/decoded.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status from the first-party backend, with the parsed body.
    #[error("Backend returned status {status}: {body}")]
    Api { status: u16, body: ErrorBody },

    /// Non-success status from the catalog API. The catalog does not
    /// guarantee structured errors, so the body is kept as raw text.
    #[error("Catalog returned status {status}: {body}")]
    Catalog { status: u16, body: String },

    /// Configuration loading/parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Internal error (client construction, invalid local state)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status carried by this error, if it originated from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } | AppError::Catalog { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for marquee operations
pub type Result<T> = std::result::Result<T, AppError>;
