//! SQL executor
//!
//! This module applies generated statements to the source database.

use crate::db::connection::DatabaseConnection;
use crate::error::{Error, Result};

/// SQL executor for running generated statements
pub struct StatementExecutor {
    connection: DatabaseConnection,
}

impl StatementExecutor {
    /// Create a new SQL executor
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Execute multiple SQL statements in a transaction.
    ///
    /// Stops at the first failure and rolls back. MySQL commits most DDL
    /// implicitly, so statements that already ran may stay applied.
    pub async fn execute_in_transaction(&self, statements: &[String]) -> Result<()> {
        let mut tx = self.connection.pool().begin().await?;

        for (i, statement) in statements.iter().enumerate() {
            tracing::debug!(statement_number = i + 1, sql = %statement, "Executing statement");

            if let Err(source) = sqlx::query(statement).execute(&mut *tx).await {
                tracing::error!(statement_number = i + 1, error = %source, "Statement failed, rolling back");
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(error = %e, "Rollback failed");
                }
                return Err(Error::ExecutionError {
                    statement: statement.clone(),
                    source,
                });
            }
        }

        tx.commit().await?;
        tracing::info!(statements = statements.len(), "Statements applied");
        Ok(())
    }
}
