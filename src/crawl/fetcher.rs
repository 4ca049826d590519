// src/crawl/fetcher.rs
// =============================================================================
// The fetch capability the crawler depends on.
//
// The crawler never talks to the network itself. It is handed something
// that implements Fetcher and only ever calls fetch() on it. Tests and the
// demo use the in-memory FakeFetcher from fake.rs.
// =============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// A fetched page: its body and the URLs it links to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub body: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Errors a fetcher can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The fetcher has nothing for this URL
    #[error("not found: {0}")]
    NotFound(String),
}

/// Something that can fetch a page by URL.
///
/// Implementations are shared by every crawl worker, hence `Send + Sync`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}
