//! Type definitions for the parsed MySQL table model

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::resolver::ResolveWarning;

/// Engine name MySQL uses for merge tables
pub const MERGE_ENGINE: &str = "MRG_MyISAM";

/// A batch of tables from one database, resolved and read-only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaBatch {
    pub tables: IndexMap<String, Table>,
    #[serde(skip)]
    pub warnings: Vec<ResolveWarning>,
}

impl SchemaBatch {
    /// Look up a table by name
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Table names in batch order
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Represents one table as reported by `SHOW CREATE TABLE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// The statement the table was parsed from
    pub raw_ddl: String,
    /// In declaration order
    pub columns: Vec<Column>,
    /// Sorted by name
    pub indexes: Vec<Index>,
    pub engine: Engine,
    /// Listed in the `UNION=(...)` of a merge table in the same batch
    pub is_child: bool,
    /// Union members, only set on merge tables
    pub child_names: Vec<String>,
    /// Set for `CREATE TABLE x LIKE y`
    pub like_source: Option<String>,
}

impl Table {
    /// Create a new table with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_ddl: String::new(),
            columns: Vec::new(),
            indexes: Vec::new(),
            engine: Engine::default(),
            is_child: false,
            child_names: Vec::new(),
            like_source: None,
        }
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Add an index to the table
    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    /// Whether this is a merge table mother
    pub fn is_merge(&self) -> bool {
        self.engine.is_merge()
    }

    /// The original DDL without its trailing terminator
    pub fn create_statement(&self) -> &str {
        self.raw_ddl.trim_end().trim_end_matches(';').trim_end()
    }
}

/// Represents a column: its name plus the opaque type and constraint text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// e.g. `varchar(128) NOT NULL DEFAULT ''`
    pub descriptor: String,
}

impl Column {
    /// Create a new column with the given name and descriptor
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }
}

/// The key type of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    Primary,
    Unique,
    Key,
    Fulltext,
    Spatial,
}

impl IndexKind {
    /// Parse the keyword that precedes an index definition
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let normalized = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "PRIMARY KEY" => Some(IndexKind::Primary),
            "UNIQUE KEY" | "UNIQUE INDEX" | "UNIQUE" => Some(IndexKind::Unique),
            "KEY" | "INDEX" => Some(IndexKind::Key),
            "FULLTEXT KEY" | "FULLTEXT INDEX" => Some(IndexKind::Fulltext),
            "SPATIAL KEY" | "SPATIAL INDEX" => Some(IndexKind::Spatial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Primary => "PRIMARY KEY",
            IndexKind::Unique => "UNIQUE KEY",
            IndexKind::Key => "KEY",
            IndexKind::Fulltext => "FULLTEXT KEY",
            IndexKind::Spatial => "SPATIAL KEY",
        }
    }

    /// Keyword used in `ALTER TABLE ... DROP <keyword>`.
    ///
    /// MySQL only accepts `DROP PRIMARY KEY` and `DROP KEY name`, so every
    /// secondary kind collapses to `KEY`.
    pub fn drop_keyword(&self) -> &'static str {
        match self {
            IndexKind::Primary => "PRIMARY KEY",
            _ => "KEY",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Empty for the primary key
    pub name: String,
    pub kind: IndexKind,
    /// Column list with all whitespace removed, e.g. `` `a`,`b`(10) ``
    pub columns: String,
}

impl Index {
    pub fn new(name: &str, kind: IndexKind, columns: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            columns: columns.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn primary(columns: &str) -> Self {
        Self::new("", IndexKind::Primary, columns)
    }

    pub fn is_primary(&self) -> bool {
        self.kind == IndexKind::Primary
    }
}

/// Represents the storage engine and the table options that follow it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub name: String,
    /// e.g. `DEFAULT CHARSET=utf8 UNION=(`t_0`,`t_1`)`
    pub descriptor: String,
}

impl Engine {
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }

    pub fn is_merge(&self) -> bool {
        self.name.eq_ignore_ascii_case(MERGE_ENGINE)
    }
}
