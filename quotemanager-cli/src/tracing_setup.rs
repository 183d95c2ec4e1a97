//! Tracing setup for the quotemanager CLI
//!
//! Builds a console subscriber and hands it out as a [`Logger`]. Nothing is
//! installed as the process-wide default; components get the logger
//! explicitly.
//!
//! Environment variables:
//!   LOG_LEVEL    # Default filter (default: debug)
//!   RUST_LOG     # Overrides LOG_LEVEL when set

use anyhow::{anyhow, Result};
use quotemanager_server::Logger;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when present, otherwise from `level`.
fn build_filter(level: &str, rust_log: Option<String>) -> Result<EnvFilter> {
    let directives = rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| level.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|err| anyhow!("invalid log filter '{directives}': {err}"))
}

pub fn build_logger(level: &str) -> Result<Logger> {
    let filter = build_filter(level, std::env::var("RUST_LOG").ok())?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    Ok(Logger::from_subscriber(subscriber))
}
