//! The `GetArticles` operation.
//!
//! Ties the pipeline together: search, link filter, enrichment. Search
//! failures fail the call with a distinct status; enrichment never does.

use crate::api::{SearchApi, SearchError};
use crate::enrich::Enricher;
use crate::filter::filter_references;
use crate::models::{EnrichmentRequest, EnrichmentResponse};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors surfaced to RPC callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Body of an error reply.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// gRPC-style status name.
    pub code: &'static str,
    pub message: String,
}

impl ServiceError {
    /// gRPC-style status name of the error.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServiceError::Search(_) => "UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Search(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Search-and-enrich service behind the `GetArticles` RPC.
#[derive(Debug)]
pub struct ArticleService<S> {
    search: S,
    enricher: Enricher,
    link_prefix: String,
}

impl<S> ArticleService<S>
where
    S: SearchApi,
{
    pub fn new(search: S, enricher: Enricher, link_prefix: impl Into<String>) -> Self {
        Self {
            search,
            enricher,
            link_prefix: link_prefix.into(),
        }
    }

    /// Search for `request.query`, keep supported article links and enrich them.
    ///
    /// # Returns
    ///
    /// One record per supported reference, in search order.
    ///
    /// # Errors
    ///
    /// * [`ServiceError::InvalidArgument`] when the query is blank
    /// * [`ServiceError::Search`] when the search API call fails
    #[instrument(level = "info", skip_all, fields(query = %request.query, display = request.display, start = request.start))]
    pub async fn get_articles(
        &self,
        request: EnrichmentRequest,
    ) -> Result<EnrichmentResponse, ServiceError> {
        if request.query.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }

        let references = self.search.search(&request).await?;
        let found = references.len();
        let references = filter_references(references, &self.link_prefix);
        info!(found, supported = references.len(), "Search completed");

        let items = self.enricher.enrich(references).await;
        Ok(EnrichmentResponse { items })
    }
}
