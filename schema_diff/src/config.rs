//! Configuration handling for schema_diff

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};

/// Load configuration from a TOML file.
///
/// Endpoints may be left out here and supplied on the command line;
/// [`Config::validate`] checks them before use.
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Represents the complete schema_diff configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// The database that gets altered
    #[serde(default)]
    pub source: DatabaseConfig,
    /// The database whose structure is the target
    #[serde(default)]
    pub destination: DatabaseConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    /// Check that both endpoints are set
    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(Error::ConfigError("source.url is not set".to_string()));
        }
        if self.destination.url.trim().is_empty() {
            return Err(Error::ConfigError("destination.url is not set".to_string()));
        }
        Ok(())
    }
}

/// Where a schema is read from.
///
/// `url` is either a `mysql://` DSN or the path of a `.sql` dump holding
/// `CREATE TABLE` statements.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    pub pool_size: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl DatabaseConfig {
    pub fn from_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// Whether this endpoint is a live MySQL server rather than a dump file
    pub fn is_mysql(&self) -> bool {
        self.url.starts_with("mysql://") || self.url.starts_with("mariadb://")
    }
}

/// Comparison behavior
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompareConfig {
    /// Emit `DROP TABLE` for tables missing from the destination
    #[serde(default = "default_true")]
    pub allow_table_removal: bool,
    /// Emit `ENGINE=` / `UNION=` changes in addition to columns and indexes
    #[serde(default = "default_true")]
    pub compare_engine: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            allow_table_removal: true,
            compare_engine: true,
        }
    }
}

/// What happens to the generated statements
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApplyConfig {
    /// Execute the statements against the source database
    #[serde(default)]
    pub exec: bool,
    /// Write the statements to a timestamped `.sql` file in this directory
    pub script_directory: Option<String>,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
    /// Log to the terminal when no file is set. Output goes to stderr so
    /// stdout carries only generated statements.
    #[serde(default = "default_true", alias = "stdout")]
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: default_format(),
            console: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "text".to_string()
}
