// src/crawl/mod.rs
// =============================================================================
// This module handles concurrent crawling.
//
// Features:
// - One task per page, all running at the same time
// - Each URL is fetched at most once per crawl
// - Configurable depth limit
// - Results stream out of a channel as workers finish
//
// Submodules:
// - fetcher: The Fetcher trait, Page and FetchError
// - fake: An in-memory Fetcher with a small sample graph
// - event: CrawlEvent, one result line per visited URL
// - job: The shared crawl state and the worker tasks
// =============================================================================

mod event;
mod fake;
mod fetcher;
mod job;

pub use event::CrawlEvent;
pub use fake::{FakeFetcher, SAMPLE_SEED};
pub use fetcher::{FetchError, Fetcher, Page};
pub use job::{crawl, crawl_all};
