//! Database module for schema_diff
//!
//! Where table definitions come from and where statements are applied.

pub mod connection;
pub mod dump;
pub mod executor;
pub mod script;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::error::Result;

// Re-export key types
pub use connection::DatabaseConnection;
pub use dump::DumpSource;
pub use executor::StatementExecutor;

/// Anything that can list tables and report their `CREATE TABLE` text
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Names of the base tables
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// DDL of one table, as `SHOW CREATE TABLE` reports it
    async fn show_create_table(&self, name: &str) -> Result<String>;
}

/// A configured schema endpoint: a live server or a dump file
pub enum Endpoint {
    MySql(DatabaseConnection),
    Dump(DumpSource),
}

impl Endpoint {
    /// Connect to the server or read the dump named by the configuration
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        if config.is_mysql() {
            Ok(Endpoint::MySql(DatabaseConnection::connect(config).await?))
        } else {
            Ok(Endpoint::Dump(DumpSource::from_file(&config.url)?))
        }
    }

    pub fn source(&self) -> &dyn SchemaSource {
        match self {
            Endpoint::MySql(connection) => connection,
            Endpoint::Dump(dump) => dump,
        }
    }

    /// The live connection, if this endpoint has one
    pub fn connection(&self) -> Option<&DatabaseConnection> {
        match self {
            Endpoint::MySql(connection) => Some(connection),
            Endpoint::Dump(_) => None,
        }
    }
}
