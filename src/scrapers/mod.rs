//! Article page fetching and field extraction.
//!
//! Each extractor follows the same two-phase pattern:
//!
//! 1. **Fetching**: Download the article page through a shared [`PageFetcher`]
//! 2. **Parsing**: Query the HTML document for one known substructure
//!
//! # Supported Sources
//!
//! | Source | Module | Fields |
//! |--------|--------|--------|
//! | Naver News (mobile) | [`naver`] | Active navigation category, article body |
//!
//! # Failure Handling
//!
//! Extractors never return an error to the caller. They return an
//! [`Extracted`] outcome instead, so a single broken page cannot abort the
//! enrichment of a whole batch. How a degraded outcome is rendered depends on
//! the field: categories fall back to an empty string, while article bodies
//! carry a human-readable `error: ...` message.

use reqwest::Client;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

pub mod naver;

/// Errors raised while fetching or parsing an article page.
///
/// These never cross the extractor boundary; they are folded into
/// [`Extracted::Degraded`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0} not found in page")]
    ElementNotFound(&'static str),
}

/// Outcome of a single field extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// The field was found.
    Value(String),
    /// The page was fetched but the field is not present.
    Empty,
    /// Fetching or parsing failed; the message describes why.
    Degraded(String),
}

impl Extracted {
    /// Render the outcome for fields that fall back to an empty string.
    pub fn or_empty(self) -> String {
        match self {
            Extracted::Value(value) => value,
            Extracted::Empty | Extracted::Degraded(_) => String::new(),
        }
    }

    /// Render the outcome for fields that embed the failure message.
    pub fn or_error_message(self) -> String {
        match self {
            Extracted::Value(value) => value,
            Extracted::Empty => String::new(),
            Extracted::Degraded(message) => format!("error: {message}"),
        }
    }
}

impl From<ExtractError> for Extracted {
    fn from(e: ExtractError) -> Self {
        Extracted::Degraded(e.to_string())
    }
}

/// HTTP client for article pages.
///
/// Wraps a pooled [`reqwest::Client`] with a single timeout applied to every
/// request. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch a page and return its body as text.
    ///
    /// Non-2xx responses are reported as [`ExtractError::Request`].
    ///
    /// # Arguments
    ///
    /// * `url` - The page to fetch
    /// * `user_agent` - Optional `User-Agent` override; some origins reject
    ///   the default client identity
    #[instrument(level = "debug", skip_all, fields(%url))]
    pub async fn fetch_html(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> Result<String, ExtractError> {
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_or_empty() {
        assert_eq!(Extracted::Value("Politics".into()).or_empty(), "Politics");
        assert_eq!(Extracted::Empty.or_empty(), "");
        assert_eq!(Extracted::Degraded("timeout".into()).or_empty(), "");
    }

    #[test]
    fn test_or_error_message() {
        assert_eq!(Extracted::Value("Body".into()).or_error_message(), "Body");
        assert_eq!(Extracted::Empty.or_error_message(), "");
        assert_eq!(
            Extracted::Degraded("article body not found in page".into()).or_error_message(),
            "error: article body not found in page"
        );
    }

    #[tokio::test]
    async fn test_fetch_html_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", "test-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();
        let body = fetcher
            .fetch_html(&format!("{}/page", server.uri()), Some("test-agent"))
            .await
            .unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_html_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();
        let result = fetcher
            .fetch_html(&format!("{}/missing", server.uri()), None)
            .await;
        assert!(matches!(result, Err(ExtractError::Request(_))));
    }

    #[tokio::test]
    async fn test_fetch_html_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_millis(100)).unwrap();
        let result = fetcher
            .fetch_html(&format!("{}/slow", server.uri()), None)
            .await;
        assert!(result.is_err());
    }
}
