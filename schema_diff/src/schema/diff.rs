//! Schema difference calculator
//!
//! This module compares two resolved schema batches table by table.

use std::collections::HashSet;

use crate::config::CompareConfig;
use crate::schema::align::{align_columns, align_indexes, Alignment, IndexChanges};
use crate::schema::types::{Column, SchemaBatch, Table};

/// Table names partitioned by presence in source and destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSets {
    /// Only in the destination
    pub added: Vec<String>,
    /// Only in the source
    pub removed: Vec<String>,
    /// In both
    pub common: Vec<String>,
}

/// Partition two lists of table names. Each output list is sorted.
pub fn diff_table_sets(src: &[String], dst: &[String]) -> TableSets {
    let src_set: HashSet<&str> = src.iter().map(String::as_str).collect();
    let dst_set: HashSet<&str> = dst.iter().map(String::as_str).collect();

    let mut sets = TableSets::default();
    for name in &dst_set {
        if src_set.contains(name) {
            sets.common.push(name.to_string());
        } else {
            sets.added.push(name.to_string());
        }
    }
    sets.removed = src_set
        .difference(&dst_set)
        .map(|name| name.to_string())
        .collect();

    sets.added.sort();
    sets.removed.sort();
    sets.common.sort();
    sets
}

/// Storage engine options that differ between two versions of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineChange<'a> {
    /// New engine name
    pub engine: Option<&'a str>,
    /// New merge union members
    pub union: Option<&'a [String]>,
}

impl<'a> EngineChange<'a> {
    fn between(current: &'a Table, target: &'a Table) -> Option<Self> {
        let mut change = EngineChange::default();

        if !current.engine.name.eq_ignore_ascii_case(&target.engine.name) {
            change.engine = Some(target.engine.name.as_str());
        }
        if target.is_merge()
            && !target.child_names.is_empty()
            && (!current.is_merge() || current.child_names != target.child_names)
        {
            change.union = Some(target.child_names.as_slice());
        }

        if change.engine.is_none() && change.union.is_none() {
            None
        } else {
            Some(change)
        }
    }
}

/// Everything that changes within one table present on both sides
#[derive(Debug, Clone)]
pub struct TableDiff<'a> {
    pub table_name: &'a str,
    /// Union members on both sides; they receive the same statements
    pub children: Vec<&'a str>,
    pub columns: Alignment<'a, Column>,
    pub indexes: IndexChanges<'a>,
    pub engine: Option<EngineChange<'a>>,
}

impl<'a> TableDiff<'a> {
    /// Compare the current (source) and target (destination) versions of a table
    pub fn between(current: &'a Table, target: &'a Table, compare_engine: bool) -> Self {
        Self {
            table_name: &current.name,
            children: shared_children(current, target),
            columns: align_columns(&current.columns, &target.columns),
            indexes: align_indexes(&current.indexes, &target.indexes),
            engine: if compare_engine {
                EngineChange::between(current, target)
            } else {
                None
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.indexes.is_empty() && self.engine.is_none()
    }
}

/// Represents the changes needed to turn the source schema into the destination
#[derive(Debug, Clone)]
pub struct SchemaDiff<'a> {
    pub tables_to_create: Vec<&'a Table>,
    pub tables_to_drop: Vec<String>,
    pub tables_to_alter: Vec<TableDiff<'a>>,
}

impl<'a> SchemaDiff<'a> {
    /// Generate a schema diff between two resolved batches
    pub fn generate(
        source: &'a SchemaBatch,
        destination: &'a SchemaBatch,
        config: &CompareConfig,
    ) -> Self {
        let sets = diff_table_sets(&source.table_names(), &destination.table_names());

        let tables_to_create = order_creates(
            sets.added
                .iter()
                .filter_map(|name| destination.get(name))
                .collect(),
        );

        let tables_to_drop = if config.allow_table_removal {
            sets.removed
        } else {
            if !sets.removed.is_empty() {
                tracing::info!(tables = ?sets.removed, "Table removal disabled, keeping tables");
            }
            Vec::new()
        };

        let replayed = replayed_children(source, destination);
        let mut tables_to_alter = Vec::new();
        for name in &sets.common {
            let (Some(current), Some(target)) = (source.get(name), destination.get(name)) else {
                continue;
            };
            // These change only through their merge table
            if replayed.contains(name.as_str()) {
                tracing::debug!(table = %name, "Skipping merge child");
                continue;
            }

            let table_diff = TableDiff::between(current, target, config.compare_engine);
            if !table_diff.is_empty() {
                tables_to_alter.push(table_diff);
            }
        }

        Self {
            tables_to_create,
            tables_to_drop,
            tables_to_alter,
        }
    }

    /// Check if the diff is empty (no changes needed)
    pub fn is_empty(&self) -> bool {
        self.tables_to_create.is_empty()
            && self.tables_to_drop.is_empty()
            && self.tables_to_alter.is_empty()
    }
}

/// Children of `current` that `target` still lists in its union
fn shared_children<'a>(current: &'a Table, target: &Table) -> Vec<&'a str> {
    if !current.is_merge() || !target.is_merge() {
        return Vec::new();
    }
    current
        .child_names
        .iter()
        .filter(|child| target.child_names.contains(child))
        .map(String::as_str)
        .collect()
}

/// Tables whose statements are replayed from a merge table present on both sides
fn replayed_children<'a>(source: &'a SchemaBatch, destination: &SchemaBatch) -> HashSet<&'a str> {
    source
        .tables
        .values()
        .filter_map(|mother| Some((mother, destination.get(&mother.name)?)))
        .flat_map(|(mother, target)| shared_children(mother, target))
        .collect()
}

/// Order new tables so a `LIKE` table follows the table it copies
fn order_creates<'a>(tables: Vec<&'a Table>) -> Vec<&'a Table> {
    let created: HashSet<&str> = tables.iter().map(|&t| t.name.as_str()).collect();
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut ordered = Vec::with_capacity(tables.len());
    let mut pending = tables;

    while !pending.is_empty() {
        let (ready, rest): (Vec<&'a Table>, Vec<&'a Table>) =
            pending.into_iter().partition(|table| match &table.like_source {
                Some(like) => !created.contains(like.as_str()) || emitted.contains(like.as_str()),
                None => true,
            });

        // A LIKE cycle cannot be ordered; keep name order
        if ready.is_empty() {
            ordered.extend(rest);
            break;
        }

        emitted.extend(ready.iter().map(|&t| t.name.as_str()));
        ordered.extend(ready);
        pending = rest;
    }
    ordered
}
