//! Naver News article scraper.
//!
//! Scrapes the mobile article pages under `https://n.news.naver.com/mnews/`.
//! Two independent substructures are read from each page:
//!
//! - The active item of the section navigation bar, used as the category
//! - The `div#newsct_article` container, which holds the article body
//!
//! Category and content are fetched separately so that either one can fail
//! without affecting the other.

use crate::scrapers::{ExtractError, Extracted, PageFetcher};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

/// Browser-like identity sent with body fetches.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

static CATEGORY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li.Nlist_item._LNB_ITEM.is_active span.Nitem_link_menu")
        .expect("category selector is valid")
});

static CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#newsct_article").expect("content selector is valid"));

/// Fetch an article page and extract its active navigation category.
///
/// Returns [`Extracted::Empty`] when the page has no active navigation item
/// and [`Extracted::Degraded`] when the page could not be fetched. Failures
/// are logged and never propagated.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn extract_category(fetcher: &PageFetcher, url: &str) -> Extracted {
    let html = match fetcher.fetch_html(url, None).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Category fetch failed");
            return e.into();
        }
    };

    match parse_category(&html) {
        Some(category) => {
            debug!(%category, "Extracted category");
            Extracted::Value(category)
        }
        None => {
            debug!("No active navigation item");
            Extracted::Empty
        }
    }
}

/// Fetch an article page and extract its body text.
///
/// The request carries [`BROWSER_USER_AGENT`]. A missing body container is
/// reported as [`Extracted::Degraded`], as is any fetch failure, so the
/// rendered content always describes what went wrong.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn extract_content(fetcher: &PageFetcher, url: &str) -> Extracted {
    let result = match fetcher.fetch_html(url, Some(BROWSER_USER_AGENT)).await {
        Ok(html) => parse_content(&html).ok_or(ExtractError::ElementNotFound("article body")),
        Err(e) => Err(e),
    };

    match result {
        Ok(content) => {
            debug!(
                bytes = content.len(),
                preview = %truncate_for_log(&content, 80),
                "Extracted content"
            );
            Extracted::Value(content)
        }
        Err(e) => {
            warn!(error = %e, "Content extraction failed");
            e.into()
        }
    }
}

/// Find the active navigation label in an article page.
///
/// Whitespace around each text fragment is stripped; a label with no text
/// counts as absent.
pub fn parse_category(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&CATEGORY_SELECTOR)
        .next()
        .map(|element| element.text().map(str::trim).collect::<String>())
        .filter(|label| !label.is_empty())
}

/// Extract the body text of an article page.
///
/// Returns `None` when the body container is missing.
pub fn parse_content(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document.select(&CONTENT_SELECTOR).next().map(block_text)
}

/// Text of an element, one trimmed non-empty fragment per line.
///
/// `<br>` and block boundaries end up as newlines because every text node
/// becomes its own line. Script and style contents are skipped.
fn block_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style"))
            })
        })
        .filter_map(|node| node.value().as_text().map(|text| text.trim()))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
