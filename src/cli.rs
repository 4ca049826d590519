// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// With no subcommand the program runs the fixed demonstration: both tree
// comparisons, then a crawl of the sample graph. The subcommands run one
// drill at a time with a few knobs exposed.
// =============================================================================

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::crawl::SAMPLE_SEED;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "concurrency-drills",
    version = "0.1.0",
    about = "Concurrency drills: tree equivalence and a deduplicating crawler",
    long_about = "concurrency-drills runs two small fan-out/fan-in exercises. \
                  Without a subcommand it runs both with their default inputs."
)]
pub struct Cli {
    // None means "run the demonstration"
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format for stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare sample trees built from multiples of K
    ///
    /// Example: concurrency-drills trees --left 1 --right 2
    Trees {
        /// Build the left tree from multiples of this value
        ///
        /// Without --left and --right, the two canned comparisons run
        #[arg(long, requires = "right")]
        left: Option<i64>,

        /// Build the right tree from multiples of this value
        #[arg(long, requires = "left")]
        right: Option<i64>,
    },

    /// Crawl a page graph concurrently
    ///
    /// Example: concurrency-drills crawl --depth 2 --json
    Crawl {
        /// URL to start from
        #[arg(long, default_value = SAMPLE_SEED)]
        seed: String,

        /// Maximum crawl depth
        ///
        /// Depth 1 = just the seed
        /// Depth 2 = the seed + all pages it links to
        /// Depth 0 or less = nothing is fetched
        #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
        depth: i32,

        /// JSON file with the page graph to crawl instead of the sample
        #[arg(long)]
        graph: Option<PathBuf>,

        /// Output results in JSON format instead of lines
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}
