//! schema_diff: compare two MySQL schemas and emit the statements that reconcile them
//!
//! Table definitions are read from a live server or a dump file, parsed
//! into a structural model, and compared. The result is an ordered list of
//! `CREATE TABLE`, `DROP TABLE` and `ALTER TABLE` statements which, applied
//! to the source database, give it the destination's structure.

pub mod config;
pub mod db;
pub mod error;
pub mod schema;
pub mod utils;

use std::path::{Path, PathBuf};

// Re-export main types for easier access
pub use config::Config;
pub use db::connection::DatabaseConnection;
pub use db::{Endpoint, SchemaSource};
pub use error::{Error, Result};
pub use schema::analyzer::SchemaAnalyzer;
pub use schema::diff::SchemaDiff;
pub use schema::generator::{compare_schemas, MigrationGenerator};
pub use schema::types::{SchemaBatch, Table};

/// Initialize schema_diff with the specified configuration file
pub async fn init(config_path: &str) -> Result<SchemaDiffClient> {
    let config = config::load_from_file(config_path)?;
    SchemaDiffClient::new(config).await
}

/// The main client: one source endpoint, one destination endpoint
pub struct SchemaDiffClient {
    config: Config,
    source: Endpoint,
    destination: Endpoint,
}

impl SchemaDiffClient {
    /// Open both endpoints named by the configuration
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let source = Endpoint::open(&config.source).await?;
        let destination = Endpoint::open(&config.destination).await?;

        Ok(Self {
            config,
            source,
            destination,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze the source schema, the one that gets altered
    pub async fn analyze_source(&self) -> Result<SchemaBatch> {
        SchemaAnalyzer::new(self.source.source()).analyze().await
    }

    /// Analyze the destination schema, the target structure
    pub async fn analyze_destination(&self) -> Result<SchemaBatch> {
        SchemaAnalyzer::new(self.destination.source()).analyze().await
    }

    /// Generate the statements that bring the source to the destination's structure
    pub async fn compare(&self) -> Result<Vec<String>> {
        let source = self.analyze_source().await?;
        let destination = self.analyze_destination().await?;

        Ok(compare_schemas(&source, &destination, &self.config.compare))
    }

    /// Apply statements according to the `apply` configuration.
    ///
    /// Returns the path of the written script, if one was requested.
    pub async fn apply(&self, statements: &[String]) -> Result<Option<PathBuf>> {
        let script = match &self.config.apply.script_directory {
            Some(directory) => Some(db::script::write_script(Path::new(directory), statements)?),
            None => None,
        };

        if !self.config.apply.exec {
            // Just log the statements without applying
            for (i, statement) in statements.iter().enumerate() {
                tracing::info!(statement_number = i + 1, sql = %statement, "Statement (dry run)");
            }
            return Ok(script);
        }

        let connection = self.source.connection().ok_or_else(|| {
            Error::ConfigError("cannot execute statements against a dump file".to_string())
        })?;

        db::executor::StatementExecutor::new(connection.clone())
            .execute_in_transaction(statements)
            .await?;
        Ok(script)
    }

    /// Complete workflow: analyze both sides, compare, then apply
    pub async fn sync(&self) -> Result<Vec<String>> {
        let statements = self.compare().await?;

        if statements.is_empty() {
            tracing::info!("Source schema already matches the destination");
            return Ok(statements);
        }

        self.apply(&statements).await?;
        Ok(statements)
    }
}
