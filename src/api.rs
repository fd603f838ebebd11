//! Naver news search API client.
//!
//! This module provides the candidate-retrieval step of `GetArticles`: a
//! single authenticated `GET` against the news search endpoint, decoded into
//! [`SearchReference`] values.
//!
//! # Architecture
//!
//! - [`SearchApi`]: Trait describing any source of search references
//! - [`NaverSearchClient`]: The production implementation backed by `reqwest`
//!
//! The service layer is generic over [`SearchApi`] so tests can substitute a
//! canned implementation.
//!
//! # Failure Handling
//!
//! Unlike article pages, a failed search is not degraded in place: every
//! failure is returned as a [`SearchError`] and surfaced to the RPC caller.

use crate::config::Settings;
use crate::models::{EnrichmentRequest, SearchReference, SearchResponse};
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Header carrying the application's client identifier.
pub const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
/// Header carrying the application's client secret.
pub const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Errors raised by the search API step.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("search API returned an undecodable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A source of search references for a query.
pub trait SearchApi {
    /// Run one search and return the raw references in API order.
    ///
    /// # Arguments
    ///
    /// * `request` - Query text plus `display`/`start` pagination
    fn search(
        &self,
        request: &EnrichmentRequest,
    ) -> impl Future<Output = Result<Vec<SearchReference>, SearchError>> + Send;
}

/// Client for `GET /v1/search/news.json`.
///
/// Credentials are taken from [`Settings`] once, at construction.
#[derive(Clone)]
pub struct NaverSearchClient {
    client: Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for NaverSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverSearchClient")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl NaverSearchClient {
    /// Build a client from the process settings.
    ///
    /// The search request shares the page fetch timeout.
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.fetch_timeout).build()?;
        Ok(Self {
            client,
            endpoint: settings.search_endpoint.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
        })
    }
}

impl SearchApi for NaverSearchClient {
    #[instrument(level = "info", skip_all, fields(query = %request.query, display = request.display, start = request.start))]
    async fn search(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<Vec<SearchReference>, SearchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(&self.endpoint)
            .header(CLIENT_ID_HEADER, &self.client_id)
            .header(CLIENT_SECRET_HEADER, &self.client_secret)
            .query(&[("query", request.query.as_str())])
            .query(&[("display", request.display), ("start", request.start)])
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "Search request failed"))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(%status, body = %truncate_for_log(&body, 300), "Search API returned an error");
            return Err(SearchError::Status {
                status,
                body: truncate_for_log(&body, 300),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body).inspect_err(|e| {
            error!(
                error = %e,
                body = %truncate_for_log(&body, 300),
                "Search API body did not decode"
            )
        })?;

        info!(
            count = parsed.items.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Search API returned references"
        );
        Ok(parsed.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NaverSearchClient {
        let settings = Settings {
            search_endpoint: format!("{}/v1/search/news.json", server.uri()),
            client_id: "id-123".to_string(),
            client_secret: "secret-456".to_string(),
            fetch_timeout: Duration::from_secs(5),
            ..Settings::for_tests()
        };
        NaverSearchClient::new(&settings).unwrap()
    }

    fn request(query: &str) -> EnrichmentRequest {
        EnrichmentRequest {
            query: query.to_string(),
            display: 20,
            start: 3,
        }
    }

    #[tokio::test]
    async fn test_search_sends_credentials_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search/news.json"))
            .and(header(CLIENT_ID_HEADER, "id-123"))
            .and(header(CLIENT_SECRET_HEADER, "secret-456"))
            .and(query_param("query", "반도체 수출"))
            .and(query_param("display", "20"))
            .and(query_param("start", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 1,
                "items": [{
                    "title": "Chips",
                    "description": "Exports rose",
                    "link": "https://n.news.naver.com/mnews/article/001/0000000001",
                    "pubDate": "Mon, 02 Jan 2023 15:04:05 +0900"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .search(&request("반도체 수출"))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Chips");
        assert_eq!(items[0].description, "Exports rose");
        assert_eq!(items[0].raw_publish_date, "Mon, 02 Jan 2023 15:04:05 +0900");
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"errorMessage":"Authentication failed","errorCode":"024"}"#,
            ))
            .mount(&server)
            .await;

        let err = client_for(&server).search(&request("q")).await.unwrap_err();
        match err {
            SearchError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("Authentication failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_search_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).search(&request("q")).await.unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_search_unreachable() {
        let settings = Settings {
            search_endpoint: "http://127.0.0.1:1/v1/search/news.json".to_string(),
            fetch_timeout: Duration::from_secs(1),
            ..Settings::for_tests()
        };
        let client = NaverSearchClient::new(&settings).unwrap();

        let err = client.search(&request("q")).await.unwrap_err();
        assert!(matches!(err, SearchError::Request(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = Settings {
            client_secret: "super-secret".to_string(),
            ..Settings::for_tests()
        };
        let client = NaverSearchClient::new(&settings).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
