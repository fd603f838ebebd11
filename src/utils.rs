//! Utility functions for date normalization and log-friendly string handling.
//!
//! This module provides helper functions used throughout the service:
//! - Normalization of the search API's publication dates
//! - String truncation for logging response bodies and article previews

use chrono::{DateTime, NaiveDateTime, Weekday};
use tracing::debug;

/// Input format of the search API's `pubDate` field (RFC 2822 style).
pub const SOURCE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// [`SOURCE_DATE_FORMAT`] after the leading `%a,` weekday field.
const DATE_AFTER_WEEKDAY_FORMAT: &str = " %d %b %Y %H:%M:%S %z";

/// Canonical output format of [`normalize_publish_date`].
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Normalize a search API publication date into `YYYY-MM-DDTHH:MM:SS`.
///
/// The UTC offset must be present and well formed, but it is dropped from
/// the output: the wall-clock time is kept exactly as written in the source
/// string, it is not converted to UTC.
///
/// The weekday must be a valid weekday name but is not checked against the
/// date. Surrounding whitespace is not accepted.
///
/// # Arguments
///
/// * `raw` - The date as provided by the search API, e.g. `Mon, 02 Jan 2023 15:04:05 +0900`
///
/// # Returns
///
/// The canonical timestamp, or an empty string if `raw` does not match
/// [`SOURCE_DATE_FORMAT`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_publish_date("Mon, 02 Jan 2023 15:04:05 +0900"), "2023-01-02T15:04:05");
/// assert_eq!(normalize_publish_date("yesterday"), "");
/// ```
pub fn normalize_publish_date(raw: &str) -> String {
    match parse_publish_date(raw) {
        Some(parsed) => parsed.format(CANONICAL_DATE_FORMAT).to_string(),
        None => {
            debug!(raw, "Unparseable publish date");
            String::new()
        }
    }
}

/// Parse [`SOURCE_DATE_FORMAT`] without checking the weekday against the date.
fn parse_publish_date(raw: &str) -> Option<NaiveDateTime> {
    let (weekday, rest) = raw.split_once(',')?;
    weekday.parse::<Weekday>().ok()?;
    DateTime::parse_from_str(rest, DATE_AFTER_WEEKDAY_FORMAT)
        .ok()
        .map(|parsed| parsed.naive_local())
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (on a character
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_publish_date() {
        assert_eq!(
            normalize_publish_date("Mon, 02 Jan 2023 15:04:05 +0900"),
            "2023-01-02T15:04:05"
        );
    }

    #[test]
    fn test_normalize_publish_date_keeps_wall_clock_time() {
        // The offset is parsed but dropped; the time is not shifted to UTC.
        assert_eq!(
            normalize_publish_date("Tue, 31 Dec 2024 23:30:00 -0500"),
            "2024-12-31T23:30:00"
        );
        assert_eq!(
            normalize_publish_date("Tue, 31 Dec 2024 23:30:00 +0000"),
            normalize_publish_date("Tue, 31 Dec 2024 23:30:00 +0900")
        );
    }

    #[test]
    fn test_normalize_publish_date_ignores_mismatched_weekday() {
        // 2 January 2023 was a Monday.
        assert_eq!(
            normalize_publish_date("Tue, 02 Jan 2023 15:04:05 +0900"),
            "2023-01-02T15:04:05"
        );
        assert_eq!(
            normalize_publish_date("Sun, 02 Jan 2023 15:04:05 +0900"),
            "2023-01-02T15:04:05"
        );
    }

    #[test]
    fn test_normalize_publish_date_rejects_surrounding_whitespace() {
        assert_eq!(normalize_publish_date(" Mon, 02 Jan 2023 15:04:05 +0900"), "");
        assert_eq!(normalize_publish_date("Mon, 02 Jan 2023 15:04:05 +0900\n"), "");
    }

    #[test]
    fn test_normalize_publish_date_rejects_other_formats() {
        let bad = [
            "",
            "   ",
            "2023-01-02T15:04:05",
            "2023-01-02 15:04:05",
            "Mon, 02 Jan 2023 15:04:05",
            "Mon, 02 Jan 2023 15:04:05 KST",
            "Mon, 32 Jan 2023 15:04:05 +0900",
            "Mon, 02 Foo 2023 15:04:05 +0900",
            "Mon, 02 Jan 2023 25:04:05 +0900",
            "Xyz, 02 Jan 2023 15:04:05 +0900",
            "02 Jan 2023 15:04:05 +0900",
            "not a date at all",
        ];
        for raw in bad {
            assert_eq!(normalize_publish_date(raw), "", "input: {raw:?}");
        }
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // Each Hangul syllable is three bytes in UTF-8.
        let s = "가나다라";
        let result = truncate_for_log(s, 4);
        assert_eq!(result, "가…(+9 bytes)");
    }
}
