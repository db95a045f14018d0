//! Database schema analyzer
//!
//! Reads every table definition from a [`SchemaSource`], parses it and
//! resolves the batch.

use crate::db::SchemaSource;
use crate::error::Result;
use crate::schema::parser::parse_table;
use crate::schema::resolver::resolve_batch;
use crate::schema::types::SchemaBatch;

/// Schema analyzer for one database
pub struct SchemaAnalyzer<'a> {
    source: &'a dyn SchemaSource,
}

impl<'a> SchemaAnalyzer<'a> {
    /// Create a new schema analyzer
    pub fn new(source: &'a dyn SchemaSource) -> Self {
        Self { source }
    }

    /// Analyze the database schema.
    ///
    /// A table that fails to parse aborts the whole analysis.
    pub async fn analyze(&self) -> Result<SchemaBatch> {
        let names = self.source.list_tables().await?;

        let mut tables = Vec::with_capacity(names.len());
        for name in &names {
            let ddl = self.source.show_create_table(name).await?;
            tables.push(parse_table(&ddl)?);
        }

        let batch = resolve_batch(tables);
        tracing::info!(
            tables = batch.len(),
            warnings = batch.warnings.len(),
            "Analyzed schema"
        );
        Ok(batch)
    }
}
