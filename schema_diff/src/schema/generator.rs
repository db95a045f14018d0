//! Statement generator
//!
//! Renders a [`SchemaDiff`] into the ordered list of MySQL statements that
//! transforms the source database into the destination.

use crate::config::CompareConfig;
use crate::schema::align::{ChangeKind, Position};
use crate::schema::diff::{SchemaDiff, TableDiff};
use crate::schema::types::{Column, Index, SchemaBatch};
use crate::utils::naming::{quote_identifier, quote_identifier_list};

/// A single `ALTER TABLE` operation, independent of the table it targets
#[derive(Debug, Clone, PartialEq)]
enum AlterOp<'a> {
    DropIndex(&'a Index),
    DropColumn(&'a Column),
    AddColumn(&'a Column, &'a Position),
    ModifyColumn(&'a Column, &'a Position),
    AddIndex(&'a Index),
    Engine(&'a str),
    Union(&'a [String]),
}

impl AlterOp<'_> {
    fn render(&self, table: &str) -> String {
        let clause = match self {
            AlterOp::DropIndex(index) if index.is_primary() => "DROP PRIMARY KEY".to_string(),
            AlterOp::DropIndex(index) => format!(
                "DROP {} {}",
                index.kind.drop_keyword(),
                quote_identifier(&index.name)
            ),
            AlterOp::DropColumn(column) => format!("DROP COLUMN {}", quote_identifier(&column.name)),
            AlterOp::AddColumn(column, position) => format!(
                "ADD COLUMN {} {} {}",
                quote_identifier(&column.name),
                column.descriptor,
                position
            ),
            AlterOp::ModifyColumn(column, position) => format!(
                "MODIFY COLUMN {} {} {}",
                quote_identifier(&column.name),
                column.descriptor,
                position
            ),
            AlterOp::AddIndex(index) if index.is_primary() => {
                format!("ADD PRIMARY KEY ({})", index.columns)
            }
            AlterOp::AddIndex(index) => format!(
                "ADD {} {} ({})",
                index.kind,
                quote_identifier(&index.name),
                index.columns
            ),
            AlterOp::Engine(engine) => format!("ENGINE={}", engine),
            AlterOp::Union(children) => format!("UNION=({})", quote_identifier_list(children)),
        };

        format!("ALTER TABLE {} {}", quote_identifier(table), clause)
    }

    /// Engine options belong to the merge table alone
    fn replicates_to_children(&self) -> bool {
        !matches!(self, AlterOp::Engine(_) | AlterOp::Union(_))
    }
}

/// Migration SQL generator
pub struct MigrationGenerator<'a> {
    config: &'a CompareConfig,
}

impl<'a> MigrationGenerator<'a> {
    /// Create a new migration generator
    pub fn new(config: &'a CompareConfig) -> Self {
        Self { config }
    }

    /// Compare two batches and generate the statements in one step
    pub fn compare(&self, source: &SchemaBatch, destination: &SchemaBatch) -> Vec<String> {
        let diff = SchemaDiff::generate(source, destination, self.config);
        let statements = self.generate_migration_sql(&diff);

        tracing::info!(
            created = diff.tables_to_create.len(),
            dropped = diff.tables_to_drop.len(),
            altered = diff.tables_to_alter.len(),
            statements = statements.len(),
            "Schema comparison finished"
        );
        statements
    }

    /// Generate statements from a schema diff.
    ///
    /// New tables come first, then dropped tables, then altered tables in
    /// name order.
    pub fn generate_migration_sql(&self, diff: &SchemaDiff) -> Vec<String> {
        let mut statements = Vec::new();

        for table in &diff.tables_to_create {
            statements.push(table.create_statement().to_string());
        }

        for table_name in &diff.tables_to_drop {
            statements.push(format!("DROP TABLE {}", quote_identifier(table_name)));
        }

        for table_diff in &diff.tables_to_alter {
            statements.extend(self.generate_alter_table_sql(table_diff));
        }

        statements
    }

    /// Generate the statements for one table.
    ///
    /// Index drops come before column changes and index additions after
    /// them, so no index ever refers to a column that is about to go away.
    /// Every statement is repeated for each merge child right after the
    /// merge table's own.
    pub fn generate_alter_table_sql(&self, table_diff: &TableDiff) -> Vec<String> {
        let mut ops = Vec::new();

        ops.extend(table_diff.indexes.drops.iter().copied().map(AlterOp::DropIndex));
        ops.extend(table_diff.columns.drops.iter().copied().map(AlterOp::DropColumn));
        for change in &table_diff.columns.changes {
            ops.push(match change.kind {
                ChangeKind::Add => AlterOp::AddColumn(change.item, &change.position),
                ChangeKind::Modify => AlterOp::ModifyColumn(change.item, &change.position),
            });
        }
        ops.extend(table_diff.indexes.adds.iter().copied().map(AlterOp::AddIndex));

        if let Some(engine) = &table_diff.engine {
            if let Some(name) = engine.engine {
                ops.push(AlterOp::Engine(name));
            }
            if let Some(children) = engine.union {
                ops.push(AlterOp::Union(children));
            }
        }

        let mut statements = Vec::new();
        for op in &ops {
            statements.push(op.render(table_diff.table_name));
            if op.replicates_to_children() {
                for child in &table_diff.children {
                    statements.push(op.render(child));
                }
            }
        }
        statements
    }
}

/// Ordered statements that transform `source`'s structure into `destination`'s
pub fn compare_schemas(
    source: &SchemaBatch,
    destination: &SchemaBatch,
    config: &CompareConfig,
) -> Vec<String> {
    MigrationGenerator::new(config).compare(source, destination)
}
