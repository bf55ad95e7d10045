//! Marquee
//!
//! Movie metadata client bridging two heterogeneous sources — a first-party
//! REST backend and an external movie catalog — into one normalized movie
//! model, with pagination aggregation for bounded result sets and a browse
//! orchestrator that assembles home page sections fault-tolerantly.

pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod services;

pub use auth::{TokenProvider, TokenStore};
pub use config::Config;
pub use error::{AppError, ErrorBody, Result};
pub use model::{Movie, MoviePage};
pub use services::{BackendClient, Browser, CatalogClient, FetchParams, HomeParams, HomeSections};
