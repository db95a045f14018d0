//! Schema module for schema_diff
//!
//! This module handles table definition parsing, batch resolution,
//! comparison, and statement generation.

pub mod align;
pub mod analyzer;
pub mod diff;
pub mod doc;
pub mod generator;
pub mod parser;
pub mod resolver;
pub mod types;

// Re-export key types
pub use align::{align, align_columns, align_indexes, Alignment, Change, ChangeKind, Keyed, Position};
pub use analyzer::SchemaAnalyzer;
pub use diff::{diff_table_sets, SchemaDiff, TableDiff, TableSets};
pub use generator::{compare_schemas, MigrationGenerator};
pub use parser::{parse_dump, parse_table, ParseState, TableParser};
pub use resolver::{resolve_batch, ResolveWarning};
pub use types::{Column, Engine, Index, IndexKind, SchemaBatch, Table};
