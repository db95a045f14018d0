//! Table definitions read from a SQL dump instead of a live server

use async_trait::async_trait;
use indexmap::IndexMap;
use std::fs;

use crate::db::SchemaSource;
use crate::error::{Error, Result};
use crate::schema::parser::{header_name, split_dump};

/// `CREATE TABLE` statements keyed by table name, in file order
#[derive(Debug, Clone, Default)]
pub struct DumpSource {
    statements: IndexMap<String, String>,
}

impl DumpSource {
    pub fn from_text(text: &str) -> Result<Self> {
        let mut statements = IndexMap::new();
        for ddl in split_dump(text) {
            let name = header_name(&ddl)
                .ok_or_else(|| Error::malformed("expected a CREATE TABLE header", &ddl))?;
            statements.insert(name, ddl);
        }
        Ok(Self { statements })
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let source = Self::from_text(&text)?;
        tracing::debug!(path, tables = source.statements.len(), "Loaded dump");
        Ok(source)
    }
}

#[async_trait]
impl SchemaSource for DumpSource {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.statements.keys().cloned().collect())
    }

    async fn show_create_table(&self, name: &str) -> Result<String> {
        self.statements
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DatabaseError(format!("Table not found: {}", name)))
    }
}
