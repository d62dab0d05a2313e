use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `tracing` subscriber, appending plain-text lines to
/// `log_path`. The TUI owns stdout, so nothing is written to the terminal.
///
/// `RUST_LOG` takes precedence over `filter` when it is set and valid.
pub fn init(filter: &str, log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter(filter)?)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}

fn env_filter(fallback: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback)
            .with_context(|| format!("invalid log filter '{fallback}'")),
    }
}
