//! Process settings, assembled once at startup.
//!
//! Values are layered, highest precedence first:
//!
//! 1. Command-line flags and their environment variables ([`Cli`])
//! 2. The optional YAML config file (`--config`)
//! 3. Built-in defaults
//!
//! The resulting [`Settings`] is immutable and passed by reference to the
//! components that need it; business logic never reads the environment.
//!
//! # Config File
//!
//! ```yaml
//! listen_addr: "[::]:50052"
//! client_id: "your-client-id"
//! client_secret: "your-client-secret"
//! fetch_timeout_secs: 5
//! call_deadline_secs: 20
//! enrich_concurrency: 4
//! max_in_flight: 10
//! ```

use crate::cli::Cli;
use crate::filter::NAVER_ARTICLE_PREFIX;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_LISTEN_ADDR: &str = "[::]:50052";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://openapi.naver.com/v1/search/news.json";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CALL_DEADLINE_SECS: u64 = 20;
pub const DEFAULT_ENRICH_CONCURRENCY: usize = 4;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;

/// Errors raised while assembling [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid setting `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings as they may appear in the YAML config file.
///
/// Every field is optional; unknown keys are rejected to catch typos.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub listen_addr: Option<SocketAddr>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub search_endpoint: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
    pub call_deadline_secs: Option<u64>,
    pub enrich_concurrency: Option<usize>,
    pub max_in_flight: Option<usize>,
    pub link_prefix: Option<String>,
}

impl FileSettings {
    /// Load and parse a YAML config file.
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// Read-only configuration shared by every component.
#[derive(Clone)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    pub search_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    /// Timeout of every outbound request (search and article pages).
    pub fetch_timeout: Duration,
    /// Budget for the enrichment stage of one call.
    pub call_deadline: Duration,
    pub enrich_concurrency: usize,
    pub max_in_flight: usize,
    pub link_prefix: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("listen_addr", &self.listen_addr)
            .field("search_endpoint", &self.search_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("fetch_timeout", &self.fetch_timeout)
            .field("call_deadline", &self.call_deadline)
            .field("enrich_concurrency", &self.enrich_concurrency)
            .field("max_in_flight", &self.max_in_flight)
            .field("link_prefix", &self.link_prefix)
            .finish()
    }
}

impl Settings {
    /// Build settings from the parsed CLI, reading the config file it names.
    #[instrument(level = "info", skip_all, fields(config = ?cli.config))]
    pub async fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => {
                let file = FileSettings::load(path).await?;
                info!(path = %path, "Loaded config file");
                file
            }
            None => FileSettings::default(),
        };
        Self::merge(cli, file)
    }

    /// Layer CLI values over file values over defaults, then validate.
    pub fn merge(cli: &Cli, file: FileSettings) -> Result<Self, ConfigError> {
        let listen_addr = match cli.listen_addr.or(file.listen_addr) {
            Some(addr) => addr,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: "listen_addr",
                    reason: e.to_string(),
                })?,
        };

        let client_id = cli
            .client_id
            .clone()
            .or(file.client_id)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("client_id"))?;
        let client_secret = cli
            .client_secret
            .clone()
            .or(file.client_secret)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("client_secret"))?;

        let search_endpoint = cli
            .search_endpoint
            .clone()
            .or(file.search_endpoint)
            .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string());
        Url::parse(&search_endpoint).map_err(|e| ConfigError::Invalid {
            name: "search_endpoint",
            reason: e.to_string(),
        })?;

        let fetch_timeout_secs = cli
            .fetch_timeout_secs
            .or(file.fetch_timeout_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let call_deadline_secs = cli
            .call_deadline_secs
            .or(file.call_deadline_secs)
            .unwrap_or(DEFAULT_CALL_DEADLINE_SECS);
        let enrich_concurrency = cli
            .enrich_concurrency
            .or(file.enrich_concurrency)
            .unwrap_or(DEFAULT_ENRICH_CONCURRENCY);
        let max_in_flight = cli
            .max_in_flight
            .or(file.max_in_flight)
            .unwrap_or(DEFAULT_MAX_IN_FLIGHT);

        for (name, is_zero) in [
            ("fetch_timeout_secs", fetch_timeout_secs == 0),
            ("call_deadline_secs", call_deadline_secs == 0),
            ("enrich_concurrency", enrich_concurrency == 0),
            ("max_in_flight", max_in_flight == 0),
        ] {
            if is_zero {
                return Err(ConfigError::Invalid {
                    name,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let link_prefix = cli
            .link_prefix
            .clone()
            .or(file.link_prefix)
            .unwrap_or_else(|| NAVER_ARTICLE_PREFIX.to_string());

        Ok(Self {
            listen_addr,
            search_endpoint,
            client_id,
            client_secret,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            call_deadline: Duration::from_secs(call_deadline_secs),
            enrich_concurrency,
            max_in_flight,
            link_prefix,
        })
    }

    /// Defaults with placeholder credentials.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let cli = Cli {
            client_id: Some("test-id".to_string()),
            client_secret: Some("test-secret".to_string()),
            ..Cli::default()
        };
        Self::merge(&cli, FileSettings::default()).expect("default settings are valid")
    }
}
