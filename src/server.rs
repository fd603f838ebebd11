//! RPC surface of the article service.
//!
//! `GetArticles` is exposed as a JSON-over-HTTP method:
//!
//! ```text
//! POST /article.ArticleService/GetArticles
//! {"query": "...", "display": 10, "start": 1}
//! ```
//!
//! Successful calls reply `200` with `{"items": [...]}`. Failures reply with
//! an HTTP status and a `{"code", "message"}` body, see
//! [`ServiceError`](crate::service::ServiceError). The number of calls served
//! at once is bounded; extra calls wait for a free slot.

use crate::api::SearchApi;
use crate::models::{EnrichmentRequest, EnrichmentResponse};
use crate::service::{ArticleService, ServiceError};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tracing::{info, instrument};

/// Path of the `GetArticles` method.
pub const GET_ARTICLES_PATH: &str = "/article.ArticleService/GetArticles";

/// Build the router for `service`, serving at most `max_in_flight` calls at once.
pub fn create_router<S>(service: Arc<ArticleService<S>>, max_in_flight: usize) -> Router
where
    S: SearchApi + Send + Sync + 'static,
{
    Router::new()
        .route(GET_ARTICLES_PATH, post(get_articles::<S>))
        .route("/health", get(health))
        .layer(ConcurrencyLimitLayer::new(max_in_flight.max(1)))
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl-C.
#[instrument(level = "info", skip_all, fields(%addr))]
pub async fn serve(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Article RPC server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Article RPC server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn get_articles<S>(
    State(service): State<Arc<ArticleService<S>>>,
    Json(request): Json<EnrichmentRequest>,
) -> Result<Json<EnrichmentResponse>, ServiceError>
where
    S: SearchApi + Send + Sync + 'static,
{
    service.get_articles(request).await.map(Json)
}

async fn health() -> &'static str {
    "ok"
}
