//! Markdown documentation for a schema
//!
//! One section per table (merge children are skipped since they mirror
//! their merge table) listing every column with its type, nullability and a
//! description.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::schema::types::{Column, SchemaBatch, Table};
use crate::utils::naming::humanize;

const KEY_PREFIX: &str = "name_";

static TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\S+(?:\s+unsigned)?)").expect("valid type regex"));
static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bCOMMENT\s+'((?:[^']|'')*)'").expect("valid comment regex"));

/// Column descriptions keyed by column name.
///
/// Loaded from lines such as `name_created_at: creation time`; a full-width
/// colon is accepted as separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: BTreeMap<String, String>,
}

impl Dictionary {
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                let line = line.strip_prefix(KEY_PREFIX).unwrap_or(line).replace('：', ":");
                let (key, value) = line.split_once(':')?;
                if value.contains(':') {
                    return None;
                }
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Load a dictionary file. A missing file is an empty dictionary.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rendered documentation and the column names the dictionary lacked
#[derive(Debug, Clone, Default)]
pub struct SchemaDoc {
    pub markdown: String,
    /// Column name to the description that was used instead
    pub missing: BTreeMap<String, String>,
}

/// Render documentation for every non-child table in the batch
pub fn render_markdown(batch: &SchemaBatch, dictionary: &Dictionary) -> SchemaDoc {
    let mut doc = SchemaDoc::default();
    for table in batch.tables.values().filter(|t| !t.is_child) {
        render_table(table, dictionary, &mut doc);
    }
    doc
}

fn render_table(table: &Table, dictionary: &Dictionary, doc: &mut SchemaDoc) {
    let out = &mut doc.markdown;
    let _ = writeln!(out, "\n\n#### Table {}", table.name);
    let _ = writeln!(out, "No | Name | Type | Nullable | Description");
    let _ = writeln!(out, "-- | -- | -- | -- | --");

    for (i, column) in table.columns.iter().enumerate() {
        let description = match dictionary.get(&column.name) {
            Some(text) => text.to_string(),
            None => {
                let text = column_comment(column).unwrap_or_else(|| humanize(&column.name));
                doc.missing.insert(column.name.clone(), text.clone());
                text
            }
        };

        let _ = writeln!(
            out,
            "{} | {} | {} | {} | {}",
            i + 1,
            column.name,
            column_type(column),
            is_nullable(column),
            description
        );
    }
}

/// The data type at the start of a descriptor, keeping `unsigned`
pub fn column_type(column: &Column) -> &str {
    TYPE_RE
        .captures(&column.descriptor)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

pub fn is_nullable(column: &Column) -> bool {
    !column.descriptor.to_ascii_uppercase().contains("NOT NULL")
}

fn column_comment(column: &Column) -> Option<String> {
    COMMENT_RE
        .captures(&column.descriptor)
        .map(|caps| caps[1].replace("''", "'"))
        .filter(|comment| !comment.is_empty())
}

/// Append the descriptions that were not in the dictionary to its file
pub fn append_missing(path: &Path, missing: &BTreeMap<String, String>) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "\n### miss dict")?;
    for (name, description) in missing {
        writeln!(file, "{}{}: {}", KEY_PREFIX, name, description)?;
    }

    tracing::info!(
        count = missing.len(),
        path = %path.display(),
        "Added missing column descriptions to dictionary"
    );
    Ok(())
}
