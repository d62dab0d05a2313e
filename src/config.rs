//! Configuration file and data directory layout.
//!
//! Everything lives under `~/.music-catalog/`:
//! - `catalog.sqlite`: the catalog itself
//! - `config.toml`: optional settings, every key may be omitted
//! - `catalog.log`: tracing output (the TUI owns the terminal)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

pub const DATA_DIR_NAME: &str = ".music-catalog";
pub const DATABASE_FILE: &str = "catalog.sqlite";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOG_FILE: &str = "catalog.log";
pub const DEFAULT_FILTER: &str = "music_catalog=info";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Catalog file; defaults to `catalog.sqlite` in the data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins when set.
    pub filter: String,
    /// Log file; defaults to `catalog.log` in the data directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE))
    }

    pub fn log_path(&self, data_dir: &Path) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| data_dir.join(LOG_FILE))
    }
}

/// `~/.music-catalog`, resolved from the user's home directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(dirs.home_dir().join(DATA_DIR_NAME))
}

/// Read the config file at `path`. A missing file is not an error and yields
/// the defaults.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(err) => return Err(ConfigError::Read(path.to_path_buf(), err)),
    };
    toml::from_str(&contents).map_err(|err| ConfigError::Parse(path.to_path_buf(), err))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes_every_section() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml.contains("[database]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains(DEFAULT_FILTER));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[database]
path = "/srv/music/catalog.sqlite"
"#,
        )
        .unwrap();

        assert_eq!(
            config.database_path(Path::new("/home/me/.music-catalog")),
            PathBuf::from("/srv/music/catalog.sqlite")
        );
        assert_eq!(config.logging.filter, DEFAULT_FILTER);
        assert_eq!(
            config.log_path(Path::new("/data")),
            PathBuf::from("/data").join(LOG_FILE)
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[logging\nfilter = ").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse(..))));
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[logging]\nfilter = \"music_catalog=debug\"\n").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.logging.filter, "music_catalog=debug");
        assert_eq!(config.database, DatabaseConfig::default());
    }
}
