//! Enrichment of filtered search references into article records.
//!
//! Each reference is enriched independently:
//!
//! 1. Category and content are fetched concurrently from the article page
//! 2. The search API's publication date is normalized
//! 3. One [`ArticleRecord`] is assembled
//!
//! References are processed on a bounded number of concurrent workers and
//! the results are re-assembled in input order. A per-call deadline bounds the
//! whole stage: references still pending when it expires yield a record with
//! degraded fields instead of being dropped, so the output always has exactly
//! one record per input reference.

use crate::models::{ArticleRecord, SearchReference};
use crate::scrapers::{Extracted, PageFetcher, naver};
use crate::utils::normalize_publish_date;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use tokio::time::timeout_at;
use tracing::{debug, info, instrument, warn};

/// Reason recorded in `content` for references cut off by the call deadline.
pub const DEADLINE_EXCEEDED: &str = "enrichment deadline exceeded";

/// Turns search references into enriched article records.
#[derive(Debug, Clone)]
pub struct Enricher {
    fetcher: PageFetcher,
    concurrency: usize,
    deadline: Duration,
}

impl Enricher {
    /// Create an enricher.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared page client (carries the per-request timeout)
    /// * `concurrency` - Maximum references enriched at the same time
    /// * `deadline` - Budget for one call to [`Enricher::enrich`]
    pub fn new(fetcher: PageFetcher, concurrency: usize, deadline: Duration) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            deadline,
        }
    }

    /// Enrich every reference, preserving input order.
    ///
    /// Never fails and never drops a reference: the returned vector has the
    /// same length as `references`.
    #[instrument(level = "info", skip_all, fields(count = references.len()))]
    pub async fn enrich(&self, references: Vec<SearchReference>) -> Vec<ArticleRecord> {
        let total = references.len();
        let t0 = Instant::now();
        let deadline = tokio::time::Instant::now() + self.deadline;

        let mut results: Vec<(usize, Enriched)> =
            stream::iter(references.into_iter().enumerate())
                .map(|(index, reference)| async move {
                    let outcome = timeout_at(deadline, self.enrich_one(&reference)).await;
                    match outcome {
                        Ok(enriched) => (index, enriched),
                        Err(_) => {
                            warn!(index, link = %reference.link, "Enrichment deadline exceeded");
                            (
                                index,
                                Enriched {
                                    record: degraded_record(reference, DEADLINE_EXCEEDED),
                                    degraded: true,
                                },
                            )
                        }
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        results.sort_by_key(|(index, _)| *index);
        let degraded = count_degraded(&results);
        info!(
            total,
            degraded,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Enriched references"
        );
        results
            .into_iter()
            .map(|(_, enriched)| enriched.record)
            .collect()
    }

    /// Enrich a single reference.
    #[instrument(level = "debug", skip_all, fields(link = %reference.link))]
    async fn enrich_one(&self, reference: &SearchReference) -> Enriched {
        let (category, content) = tokio::join!(
            naver::extract_category(&self.fetcher, &reference.link),
            naver::extract_content(&self.fetcher, &reference.link),
        );
        debug!(
            category_found = matches!(category, Extracted::Value(_)),
            content_found = matches!(content, Extracted::Value(_)),
            "Enriched reference"
        );

        Enriched {
            degraded: matches!(content, Extracted::Degraded(_)),
            record: ArticleRecord {
                title: reference.title.clone(),
                content: content.or_error_message(),
                summary: String::new(),
                category: category.or_empty(),
                link: reference.link.clone(),
                publish_date: normalize_publish_date(&reference.raw_publish_date),
            },
        }
    }
}

/// One enriched record, tagged with whether its content fetch failed.
#[derive(Debug)]
struct Enriched {
    record: ArticleRecord,
    degraded: bool,
}

fn count_degraded(results: &[(usize, Enriched)]) -> usize {
    results.iter().filter(|(_, enriched)| enriched.degraded).count()
}

/// Record for a reference whose page fetches did not complete.
fn degraded_record(reference: SearchReference, reason: &str) -> ArticleRecord {
    ArticleRecord {
        content: Extracted::Degraded(reason.to_string()).or_error_message(),
        summary: String::new(),
        category: String::new(),
        publish_date: normalize_publish_date(&reference.raw_publish_date),
        title: reference.title,
        link: reference.link,
    }
}
