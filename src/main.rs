// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging on stderr
// 3. Dispatch to the tree drill, the crawl drill, or both
// 4. Print results on stdout
// 5. Exit with code 0, or 2 if something unexpected went wrong
//
// Rust concepts used:
// - async/await: Both drills run many tasks concurrently
// - Arc<T>: Shared ownership of data handed to spawned tasks
// - Result<T, E>: For error handling
// =============================================================================

use anyhow::{anyhow, Result};
use clap::Parser;
use concurrency_drills::cli::{Cli, Commands};
use concurrency_drills::crawl::{self, CrawlEvent, FakeFetcher, Fetcher, SAMPLE_SEED};
use concurrency_drills::logging;
use concurrency_drills::tree::{self, Tree};
use std::path::PathBuf;
use std::sync::Arc;

// Depth used by the demonstration crawl
const DEMO_DEPTH: i32 = 4;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_tracing(cli.log_format, cli.verbose)?;

    match cli.command {
        None => {
            handle_trees(None, None).await?;
            handle_crawl(SAMPLE_SEED, DEMO_DEPTH, None, false).await
        }
        Some(Commands::Trees { left, right }) => handle_trees(left, right).await,
        Some(Commands::Crawl {
            seed,
            depth,
            graph,
            json,
        }) => handle_crawl(&seed, depth, graph, json).await,
    }
}

// Handles the 'trees' subcommand
//
// With no sides given, prints the two canned comparisons: one that is
// always true, one that is always false
async fn handle_trees(left: Option<i64>, right: Option<i64>) -> Result<()> {
    match (left, right) {
        (Some(left), Some(right)) => {
            let result = compare(left, right).await?;
            println!("same(new({}), new({})): {}", left, right, result);
        }
        _ => {
            println!("true: {}", compare(1, 1).await?);
            println!("false: {}", compare(1, 2).await?);
        }
    }
    Ok(())
}

async fn compare(left: i64, right: i64) -> Result<bool> {
    let a = Arc::new(sample_tree(left)?);
    let b = Arc::new(sample_tree(right)?);
    tracing::debug!(left = %a, right = %b, "comparing trees");
    Ok(tree::same(a, b).await)
}

fn sample_tree(k: i64) -> Result<Tree> {
    Tree::new(k).ok_or_else(|| anyhow!("{} is too large: 10 * {} does not fit in an i64", k, k))
}

// Handles the 'crawl' subcommand
//
// Lines are printed as they arrive. In JSON mode we have to wait for the
// whole crawl, since the output is a single array.
async fn handle_crawl(seed: &str, depth: i32, graph: Option<PathBuf>, json: bool) -> Result<()> {
    let fetcher: Arc<dyn Fetcher> = match graph {
        Some(path) => Arc::new(FakeFetcher::from_json_file(path)?),
        None => Arc::new(FakeFetcher::sample()),
    };

    tracing::info!(seed, depth, "starting crawl");

    if json {
        let events = crawl::crawl_all(seed, depth, fetcher).await;
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    let mut results = crawl::crawl(seed, depth, fetcher);
    let mut events = Vec::new();
    while let Some(event) = results.recv().await {
        println!("{}", event);
        events.push(event);
    }
    print_summary(&events);
    Ok(())
}

fn print_summary(events: &[CrawlEvent]) {
    let found = events.iter().filter(|e| e.is_found()).count();

    println!();
    println!("Summary:");
    println!("   Found: {}", found);
    println!("   Failed: {}", events.len() - found);
    println!("   Total: {}", events.len());
}
