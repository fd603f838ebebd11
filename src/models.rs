//! Data models for search references, enriched articles and the RPC payloads.
//!
//! This module defines the core data structures used throughout the service:
//! - [`SearchReference`]: A raw item returned by the news search API
//! - [`ArticleRecord`]: An enriched article as returned to RPC callers
//! - [`EnrichmentRequest`] / [`EnrichmentResponse`]: The `GetArticles` payloads
//!
//! The wire names follow the search API (`pubDate`) and the RPC contract
//! (`publishDate`), hence the `serde(rename)` attributes.

use serde::{Deserialize, Serialize};

/// Default number of results requested from the search API.
pub const DEFAULT_DISPLAY: u32 = 10;
/// Default 1-based offset into the search API results.
pub const DEFAULT_START: u32 = 1;

/// A raw news item as returned by the search API.
///
/// References are transient: they exist only for the duration of one
/// `GetArticles` call, between the search step and enrichment.
///
/// Missing fields decode as empty strings so that a sparse item never fails
/// the whole search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchReference {
    /// Headline as provided by the search API (may contain `<b>` highlights).
    #[serde(default)]
    pub title: String,
    /// Short description snippet.
    #[serde(default)]
    pub description: String,
    /// Canonical link to the article page.
    #[serde(default)]
    pub link: String,
    /// Publication timestamp in the search API's RFC 2822 style.
    #[serde(default, rename = "pubDate")]
    pub raw_publish_date: String,
}

/// The body of a search API reply.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchReference>,
}

/// An enriched article, the unit of a `GetArticles` reply.
///
/// Every record corresponds to exactly one [`SearchReference`] that passed
/// the link filter. Fields degrade in place instead of the record being
/// dropped:
///
/// * `content` may hold an `error: ...` message instead of article text
/// * `category` may be empty
/// * `publish_date` is empty when the source date could not be parsed
/// * `summary` is always empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: String,
    pub link: String,
    #[serde(rename = "publishDate")]
    pub publish_date: String,
}

/// Request payload of the `GetArticles` RPC.
///
/// `display` and `start` are unsigned so negative values are rejected while
/// decoding. No upper bound is enforced here; the search API applies its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    pub query: String,
    #[serde(default = "default_display")]
    pub display: u32,
    #[serde(default = "default_start")]
    pub start: u32,
}

fn default_display() -> u32 {
    DEFAULT_DISPLAY
}

fn default_start() -> u32 {
    DEFAULT_START
}

/// Reply payload of the `GetArticles` RPC.
///
/// Items keep the order of the filtered search references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResponse {
    pub items: Vec<ArticleRecord>,
}
