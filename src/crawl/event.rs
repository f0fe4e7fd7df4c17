// src/crawl/event.rs
// =============================================================================
// What a crawl reports back to its consumer.
//
// Each visited URL produces exactly one event: `Found` if the fetch worked,
// `Error` if it didn't. Events render either as a plain text line or as a
// JSON object (one per line).
// =============================================================================

use crate::fetch::FetchError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// The page was fetched
    Found { url: String, body: String },
    /// The fetch failed; nothing below this URL is crawled
    Error {
        url: String,
        error: FetchError,
        message: String,
    },
}

impl CrawlEvent {
    pub fn found(url: impl Into<String>, body: impl Into<String>) -> Self {
        CrawlEvent::Found {
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn error(error: FetchError) -> Self {
        CrawlEvent::Error {
            url: error.url().to_string(),
            message: error.to_string(),
            error,
        }
    }

    /// The URL this event is about
    pub fn url(&self) -> &str {
        match self {
            CrawlEvent::Found { url, .. } | CrawlEvent::Error { url, .. } => url,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CrawlEvent::Error { .. })
    }
}

// Text form, one line per event (without the trailing newline):
//   found: https://golang.org/ "The Go Programming Language"
//   not found: https://golang.org/cmd/
impl fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlEvent::Found { url, body } => write!(f, "found: {} {:?}", url, body),
            CrawlEvent::Error { message, .. } => write!(f, "{}", message),
        }
    }
}
