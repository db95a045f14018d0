//! Error types for schema_diff

use thiserror::Error;

/// Result type for schema_diff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schema_diff
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// The parser never reached the end of the table definition.
    #[error("Malformed DDL: {reason}\n{ddl}")]
    MalformedDdl { reason: String, ddl: String },

    #[error("Statement failed: {statement}: {source}")]
    ExecutionError {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>, ddl: &str) -> Self {
        Error::MalformedDdl {
            reason: reason.into(),
            ddl: ddl.to_string(),
        }
    }
}

/// Convert TOML deserialization errors to schema_diff errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}
