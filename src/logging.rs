// src/logging.rs
// =============================================================================
// Sets up `tracing` for the whole program.
//
// Logs always go to stderr. stdout is reserved for results, so piping the
// output (for example `crawl --json | jq`) keeps working with logging on.
//
// RUST_LOG wins if it is set. Otherwise the level is "warn", or "debug"
// for this crate when --verbose is passed.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

pub fn setup_tracing(format: LogFormat, verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("concurrency_drills=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
