//! Binary entry point: resolve the data directory and config, bring up
//! logging and the SQLite catalog, then either run a one-shot command or hand
//! the connection to the Ratatui event loop.
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use music_catalog::cli::{self, Cli};
use music_catalog::config::{self, Config, CONFIG_FILE};
use music_catalog::{db, logging, run_app, App};

fn main() -> Result<()> {
    let args = Cli::parse();

    let data_dir = config::data_dir()?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    // An unreadable config falls back to defaults; the warning is logged once
    // the subscriber is installed.
    let (config, config_warning) = match config::load(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    let log_path = config.log_path(&data_dir);
    ensure_parent(&log_path)?;
    logging::init(&config.logging.filter, &log_path)?;
    if let Some(err) = config_warning {
        tracing::warn!(error = %err, "using default configuration");
    }

    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| config.database_path(&data_dir));
    ensure_parent(&db_path)?;
    let conn = db::open_catalog(&db_path)
        .with_context(|| format!("failed to open catalog {}", db_path.display()))?;

    match &args.command {
        Some(command) => {
            let stdout = io::stdout();
            cli::run_command(&conn, command, &mut stdout.lock())
        }
        None => {
            let mut app = App::new(conn)?;
            run_app(&mut app)
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display())),
        _ => Ok(()),
    }
}
