// src/lib.rs
// =============================================================================
// Library root. main.rs is a thin CLI over these modules.
//
// Modules:
// - tree: Concurrent in-order walks and tree equivalence
// - crawl: A concurrent, deduplicating crawler over an injected Fetcher
// - cli: Command-line definitions
// - logging: tracing setup
// =============================================================================

pub mod cli;
pub mod crawl;
pub mod logging;
pub mod tree;
