// src/crawl/fake.rs
// =============================================================================
// An in-memory Fetcher backed by a HashMap.
//
// Used by the demo and by the tests. The sample graph has cycles (pages
// link back to pages already visited) and one dangling link, so a crawl
// over it exercises both deduplication and fetch failures.
//
// Graphs can also be loaded from a JSON file shaped like:
//   {
//     "https://example.com/": { "body": "Home", "urls": ["https://example.com/a"] },
//     "https://example.com/a": { "body": "A" }
//   }
// =============================================================================

use super::fetcher::{FetchError, Fetcher, Page};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Seed URL of the sample graph
pub const SAMPLE_SEED: &str = "https://docs.example.com/";

/// Fetcher that answers from a fixed map of canned pages.
#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Page>,
}

impl FakeFetcher {
    pub fn new(pages: HashMap<String, Page>) -> Self {
        FakeFetcher { pages }
    }

    /// The sample graph: four pages with canned bodies, linking to each
    /// other and to one page (`/cmd/`) that does not exist.
    pub fn sample() -> Self {
        let mut fetcher = FakeFetcher::default();
        fetcher.insert(
            "https://docs.example.com/",
            "The Example Documentation",
            &["https://docs.example.com/pkg/", "https://docs.example.com/cmd/"],
        );
        fetcher.insert(
            "https://docs.example.com/pkg/",
            "Packages",
            &[
                "https://docs.example.com/",
                "https://docs.example.com/cmd/",
                "https://docs.example.com/pkg/fmt/",
                "https://docs.example.com/pkg/os/",
            ],
        );
        fetcher.insert(
            "https://docs.example.com/pkg/fmt/",
            "Package fmt",
            &["https://docs.example.com/", "https://docs.example.com/pkg/"],
        );
        fetcher.insert(
            "https://docs.example.com/pkg/os/",
            "Package os",
            &["https://docs.example.com/", "https://docs.example.com/pkg/"],
        );
        fetcher
    }

    /// Loads a graph from a JSON object mapping URL to page.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read graph file {}", path.display()))?;
        let pages: HashMap<String, Page> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid graph file {}", path.display()))?;

        tracing::debug!(pages = pages.len(), path = %path.display(), "loaded crawl graph");
        Ok(FakeFetcher::new(pages))
    }

    pub fn insert(&mut self, url: &str, body: &str, urls: &[&str]) {
        self.pages.insert(
            url.to_string(),
            Page {
                body: body.to_string(),
                urls: urls.iter().map(|u| u.to_string()).collect(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
