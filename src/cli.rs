//! Command-line interface definitions for the article service.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also be provided through an environment variable (a
//! `.env` file in the working directory is loaded first). Options left unset
//! fall back to the optional YAML config file, then to built-in defaults.

use clap::Parser;
use std::net::SocketAddr;

/// Command-line arguments for the article service.
///
/// # Examples
///
/// ```sh
/// # Credentials from the environment, everything else default
/// NAVER_CLIENT_ID=... NAVER_CLIENT_SECRET=... naver_article_service
///
/// # Custom port and a more generous enrichment budget
/// naver_article_service --listen-addr 0.0.0.0:8080 --call-deadline-secs 45
///
/// # Settings from a YAML file
/// naver_article_service -c ./article_service.yaml
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "ARTICLE_CONFIG")]
    pub config: Option<String>,

    /// Address the RPC server listens on [default: [::]:50052]
    #[arg(short, long, env = "ARTICLE_LISTEN_ADDR")]
    pub listen_addr: Option<SocketAddr>,

    /// Naver search API client identifier
    #[arg(long, env = "NAVER_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Naver search API client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// News search endpoint
    #[arg(long, env = "NAVER_SEARCH_ENDPOINT")]
    pub search_endpoint: Option<String>,

    /// Timeout applied to every outbound request, in seconds [default: 5]
    #[arg(long, env = "ARTICLE_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: Option<u64>,

    /// Upper bound on the enrichment stage of one call, in seconds [default: 20]
    #[arg(long, env = "ARTICLE_CALL_DEADLINE_SECS")]
    pub call_deadline_secs: Option<u64>,

    /// Articles enriched concurrently within one call [default: 4]
    #[arg(long, env = "ARTICLE_ENRICH_CONCURRENCY")]
    pub enrich_concurrency: Option<usize>,

    /// Calls served concurrently [default: 10]
    #[arg(long, env = "ARTICLE_MAX_IN_FLIGHT")]
    pub max_in_flight: Option<usize>,

    /// Link prefix of article pages the scrapers understand
    #[arg(long, env = "ARTICLE_LINK_PREFIX")]
    pub link_prefix: Option<String>,
}
