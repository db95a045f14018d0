//! Database connection handling
//!
//! This module provides the MySQL connection pool and reads table
//! definitions from a live server.

use async_trait::async_trait;
use sqlx::{mysql::MySqlPoolOptions, FromRow, MySql, Pool};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::db::SchemaSource;
use crate::error::{Error, Result};
use crate::utils::naming::quote_identifier;

#[derive(FromRow)]
struct CreateTableRow {
    #[sqlx(rename = "Create Table")]
    create_table: String,
}

/// A pooled connection to one MySQL database
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: Pool<MySql>,
}

impl DatabaseConnection {
    /// Create a new database connection from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if !config.is_mysql() {
            return Err(Error::DatabaseError(format!(
                "Not a MySQL connection url: {}",
                config.url
            )));
        }

        let pool_size = config.pool_size.unwrap_or(2);
        let timeout_seconds = config.timeout_seconds.unwrap_or(30);

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<MySql> {
        &self.pool
    }

}

#[async_trait]
impl SchemaSource for DatabaseConnection {
    async fn list_tables(&self) -> Result<Vec<String>> {
        // Views report a different DDL shape, so only base tables are listed
        let rows: Vec<(String, String)> =
            sqlx::query_as("SHOW FULL TABLES WHERE Table_type = 'BASE TABLE'")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(name, _)| name).collect())
    }

    async fn show_create_table(&self, name: &str) -> Result<String> {
        let sql = format!("SHOW CREATE TABLE {}", quote_identifier(name));
        let row = sqlx::query_as::<_, CreateTableRow>(&sql)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::DatabaseError(format!("Table not found: {}", name)))?;

        Ok(row.create_table)
    }
}
