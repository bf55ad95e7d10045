//! Application services for marquee.

pub mod backend;
pub mod browse;
pub mod catalog;

pub use backend::{BackendClient, RatingInput};
pub use browse::{Browser, FetchParams, HomeParams, HomeSections};
pub use catalog::CatalogClient;
