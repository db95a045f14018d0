//! Batch resolution of merge children and `LIKE` tables
//!
//! Runs once over every table parsed from one database. The result is a
//! new [`SchemaBatch`]; nothing is mutated after this point.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

use crate::schema::types::{SchemaBatch, Table};

/// A reference that could not be resolved within the batch.
///
/// These never abort a run; they are logged and kept on the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// A merge table lists a union member that is not in the batch
    UnknownChildReference { mother: String, child: String },
    /// A `LIKE` table names a source that is not in the batch; the
    /// dependent table keeps an empty structure
    AmbiguousLikeSource { table: String, source: String },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveWarning::UnknownChildReference { mother, child } => {
                write!(f, "merge table `{}` lists unknown child `{}`", mother, child)
            }
            ResolveWarning::AmbiguousLikeSource { table, source } => {
                write!(f, "table `{}` is LIKE unknown table `{}`", table, source)
            }
        }
    }
}

/// Resolve a batch of parsed tables.
///
/// Merge children are flagged `is_child`. `LIKE` tables receive a copy of
/// their source's columns, indexes and engine as parsed; chains of `LIKE`
/// are not followed.
pub fn resolve_batch(tables: Vec<Table>) -> SchemaBatch {
    let parsed: IndexMap<String, Table> = tables
        .into_iter()
        .map(|table| (table.name.clone(), table))
        .collect();

    let mut warnings = Vec::new();

    // Phase 1: collect references against the parsed snapshot
    let mut children = HashSet::new();
    for mother in parsed.values().filter(|t| t.is_merge()) {
        for child in &mother.child_names {
            if parsed.contains_key(child) {
                children.insert(child.clone());
            } else {
                warnings.push(ResolveWarning::UnknownChildReference {
                    mother: mother.name.clone(),
                    child: child.clone(),
                });
            }
        }
    }

    // Phase 2: build the resolved tables
    let mut resolved = IndexMap::with_capacity(parsed.len());
    for (name, table) in &parsed {
        let mut table = table.clone();
        table.is_child = children.contains(name);

        if let Some(source_name) = &table.like_source {
            match parsed.get(source_name) {
                Some(source) => {
                    table.columns = source.columns.clone();
                    table.indexes = source.indexes.clone();
                    table.engine = source.engine.clone();
                }
                None => warnings.push(ResolveWarning::AmbiguousLikeSource {
                    table: name.clone(),
                    source: source_name.clone(),
                }),
            }
        }

        resolved.insert(name.clone(), table);
    }

    for warning in &warnings {
        tracing::warn!(%warning, "Unresolved table reference");
    }

    SchemaBatch {
        tables: resolved,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{Column, Engine, Index, IndexKind};
    use pretty_assertions::assert_eq;

    fn table(name: &str, columns: &[&str]) -> Table {
        let mut table = Table::new(name);
        for column in columns {
            table.add_column(Column::new(column, "int(11) NOT NULL"));
        }
        table.add_index(Index::new(columns[0], IndexKind::Key, &format!("`{}`", columns[0])));
        table.engine = Engine::new("MyISAM", "DEFAULT CHARSET=utf8");
        table
    }

    fn merge(name: &str, children: &[&str]) -> Table {
        let mut table = table(name, &["id"]);
        table.engine = Engine::new("MRG_MyISAM", "UNION=(...)");
        table.child_names = children.iter().map(|c| c.to_string()).collect();
        table
    }

    fn like(name: &str, source: &str) -> Table {
        let mut table = Table::new(name);
        table.like_source = Some(source.to_string());
        table
    }

    #[test]
    fn marks_merge_children() {
        let batch = resolve_batch(vec![
            merge("log", &["log_0", "log_1"]),
            table("log_0", &["id"]),
            table("log_1", &["id"]),
            table("other", &["id"]),
        ]);

        assert!(!batch.get("log").unwrap().is_child);
        assert!(batch.get("log_0").unwrap().is_child);
        assert!(batch.get("log_1").unwrap().is_child);
        assert!(!batch.get("other").unwrap().is_child);
        assert!(batch.warnings.is_empty());
    }

    #[test]
    fn unknown_child_is_tolerated() {
        let batch = resolve_batch(vec![merge("log", &["log_0", "missing"]), table("log_0", &["id"])]);

        assert!(batch.get("log_0").unwrap().is_child);
        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.warnings,
            vec![ResolveWarning::UnknownChildReference {
                mother: "log".to_string(),
                child: "missing".to_string(),
            }]
        );
    }

    #[test]
    fn like_copies_structure() {
        let batch = resolve_batch(vec![like("user_copy", "user"), table("user", &["id", "name"])]);

        let source = batch.get("user").unwrap();
        let copy = batch.get("user_copy").unwrap();
        assert_eq!(copy.columns, source.columns);
        assert_eq!(copy.indexes, source.indexes);
        assert_eq!(copy.engine, source.engine);
        assert_eq!(copy.like_source.as_deref(), Some("user"));
    }

    #[test]
    fn like_chains_are_not_followed() {
        let batch = resolve_batch(vec![
            table("a", &["id"]),
            like("b", "a"),
            like("c", "b"),
        ]);

        assert_eq!(batch.get("b").unwrap().columns.len(), 1);
        assert!(batch.get("c").unwrap().columns.is_empty());
    }

    #[test]
    fn missing_like_source_leaves_table_empty() {
        let batch = resolve_batch(vec![like("orphan", "gone")]);

        let orphan = batch.get("orphan").unwrap();
        assert!(orphan.columns.is_empty());
        assert!(orphan.indexes.is_empty());
        assert_eq!(
            batch.warnings,
            vec![ResolveWarning::AmbiguousLikeSource {
                table: "orphan".to_string(),
                source: "gone".to_string(),
            }]
        );
    }
}
