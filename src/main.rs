//! # Naver Article Service
//!
//! An RPC service that answers a news query with fully enriched articles.
//! Candidate articles come from the Naver news search API; each one is then
//! enriched with its body text and section category, scraped from the live
//! article page, and a normalized publication date.
//!
//! ## Usage
//!
//! ```sh
//! NAVER_CLIENT_ID=... NAVER_CLIENT_SECRET=... naver_article_service
//!
//! curl -s localhost:50052/article.ArticleService/GetArticles \
//!   -H 'content-type: application/json' \
//!   -d '{"query": "반도체", "display": 10, "start": 1}'
//! ```
//!
//! ## Architecture
//!
//! Each `GetArticles` call runs a pipeline:
//! 1. **Search**: Query the news search API for candidate references
//! 2. **Filtering**: Keep references that link to Naver mobile article pages
//! 3. **Enrichment**: Fetch every page concurrently (bounded) and extract
//!    category and body; pages that fail degrade their fields in place
//! 4. **Reply**: Records in search order, one per filtered reference

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod enrich;
mod filter;
mod models;
mod scrapers;
mod server;
mod service;
mod utils;

use api::NaverSearchClient;
use cli::Cli;
use config::Settings;
use enrich::Enricher;
use scrapers::PageFetcher;
use service::ArticleService;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // Environment file first, so it can feed both RUST_LOG and the CLI.
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "article service starting up");
    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded environment file"),
        Err(e) => debug!(error = %e, "No environment file loaded"),
    }

    let args = Cli::parse();
    let settings = Settings::load(&args).await?;
    debug!(?settings, "Resolved settings");

    let search = NaverSearchClient::new(&settings)?;
    let fetcher = PageFetcher::new(settings.fetch_timeout)?;
    let enricher = Enricher::new(fetcher, settings.enrich_concurrency, settings.call_deadline);
    let service = Arc::new(ArticleService::new(
        search,
        enricher,
        settings.link_prefix.clone(),
    ));

    info!(
        fetch_timeout = ?settings.fetch_timeout,
        call_deadline = ?settings.call_deadline,
        enrich_concurrency = settings.enrich_concurrency,
        max_in_flight = settings.max_in_flight,
        "Article service configured"
    );

    let router = server::create_router(service, settings.max_in_flight);
    server::serve(router, settings.listen_addr).await?;

    Ok(())
}
