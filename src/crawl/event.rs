// src/crawl/event.rs
// =============================================================================
// One result line of a crawl.
//
// Every crawl worker emits exactly one CrawlEvent: either the page it
// fetched or the error it got. Display renders the human-readable line,
// Serialize renders the JSON form used by --json.
// =============================================================================

use serde::Serialize;
use std::fmt;

/// The outcome of visiting one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// The page was fetched
    Found { url: String, body: String },
    /// The fetch failed; `error` is the fetcher's message
    Failed { url: String, error: String },
}

impl CrawlEvent {
    pub fn url(&self) -> &str {
        match self {
            CrawlEvent::Found { url, .. } | CrawlEvent::Failed { url, .. } => url,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, CrawlEvent::Found { .. })
    }
}

impl fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // {:?} quotes and escapes the body
            CrawlEvent::Found { url, body } => write!(f, "found: {} {:?}", url, body),
            CrawlEvent::Failed { error, .. } => write!(f, "{}", error),
        }
    }
}
