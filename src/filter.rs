//! Selection of search references that point at parseable article pages.
//!
//! The search API returns links to many outlets, but only Naver's own
//! mobile news pages share the markup the extractors understand.

use crate::models::SearchReference;
use tracing::debug;

/// Link prefix of Naver mobile news article pages.
pub const NAVER_ARTICLE_PREFIX: &str = "https://n.news.naver.com/mnews/";

/// Keep only references whose link starts with `prefix`.
///
/// Order is preserved and nothing else about the references is inspected.
pub fn filter_references(items: Vec<SearchReference>, prefix: &str) -> Vec<SearchReference> {
    let total = items.len();
    let kept: Vec<SearchReference> = items
        .into_iter()
        .filter(|item| item.link.starts_with(prefix))
        .collect();
    debug!(total, kept = kept.len(), prefix, "Filtered search references");
    kept
}
