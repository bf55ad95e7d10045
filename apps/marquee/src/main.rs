//! Demo binary: fetch the home page sections and log what each would render.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee::config::Config;
use marquee::model::Movie;
use marquee::services::{Browser, CatalogClient, HomeParams};

fn init_tracing() {
    // RUST_LOG environment variable controls log levels
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("marquee=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_section(name: &str, movies: &[Movie]) {
    tracing::info!(section = name, count = movies.len(), "Section ready");
    for movie in movies {
        tracing::info!(
            section = name,
            id = %movie.id,
            title = %movie.title,
            year = %movie.year,
            rating = ?movie.avg_rating,
            "movie"
        );
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = match CatalogClient::new(&config.catalog) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!("Failed to create catalog client: {}", e);
            std::process::exit(1);
        }
    };

    let browser = Browser::new(catalog);

    match browser.home_sections(&HomeParams::default()).await {
        Ok(sections) => {
            tracing::info!(
                main = sections.main.movies.len(),
                featured = sections.featured.len(),
                "Home page assembled"
            );
            log_section("featured", &sections.featured);
            log_section("top-rated", &sections.top_rated);
            log_section("popular", &sections.popular);
            log_section("newly-added", &sections.newly_added);
        }
        Err(e) => {
            tracing::error!("Failed to assemble home page: {}", e);
            std::process::exit(1);
        }
    }
}
