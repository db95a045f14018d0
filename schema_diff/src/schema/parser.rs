//! `CREATE TABLE` parser
//!
//! Turns the DDL reported by `SHOW CREATE TABLE` into a [`Table`]. The input
//! carries one definition per line, so parsing is a forward-only state
//! machine over lines:
//!
//! ```text
//! TableName -> Columns -> Indexes -> Engine -> Done
//! ```
//!
//! A `CREATE TABLE x LIKE y` header jumps straight to `Done`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{Error, Result};
use crate::schema::types::{Column, Engine, Index, IndexKind, Table};

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*CREATE\s+(?:TEMPORARY\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?`([^`]+)`(.*)$",
    )
    .expect("valid header regex")
});
static LIKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bLIKE\s+`([^`]+)`").expect("valid like regex"));
static COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*`([^`]+)`\s+(.+?),?\s*$").expect("valid column regex"));
static INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*((?:PRIMARY|UNIQUE|FULLTEXT|SPATIAL)\s+)?(?:KEY|INDEX)\s*(?:`([^`]+)`)?\s*\((.*)$")
        .expect("valid index regex")
});
static ENGINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\)\s*ENGINE\s*=\s*([^\s;]+)\s*(.*?)\s*;?\s*$").expect("valid engine regex")
});
static UNION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)UNION\s*=\s*\(([^)]*)\)").expect("valid union regex"));
static QUOTED_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid name regex"));
static DUMP_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ims)^[ \t]*CREATE\s+TABLE\b.*?;[ \t]*$").expect("valid dump regex")
});

/// Where the parser is within a table definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    TableName,
    Columns,
    Indexes,
    Engine,
    Done,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseState::TableName => "table-name",
            ParseState::Columns => "columns",
            ParseState::Indexes => "indexes",
            ParseState::Engine => "engine",
            ParseState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Line-by-line parser for a single table definition
#[derive(Debug)]
pub struct TableParser {
    state: ParseState,
    table: Table,
}

impl Default for TableParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TableParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::TableName,
            table: Table::new(""),
        }
    }

    /// Consume one line and return the state reached.
    ///
    /// A line that ends the current section is re-examined by the next one,
    /// so the column section hands its first non-column line to the index
    /// section and so on.
    pub fn feed(&mut self, line: &str) -> Result<ParseState> {
        let line = line.trim_end_matches('\r');

        loop {
            match self.state {
                ParseState::TableName => {
                    self.parse_header(line)?;
                    return Ok(self.state);
                }
                ParseState::Columns => match parse_column(line) {
                    Some(column) => {
                        self.table.add_column(column);
                        return Ok(self.state);
                    }
                    None => self.state = ParseState::Indexes,
                },
                ParseState::Indexes => match parse_index(line) {
                    Some(index) => {
                        self.table.add_index(index);
                        return Ok(self.state);
                    }
                    None => {
                        self.table.indexes.sort_by(|a, b| a.name.cmp(&b.name));
                        self.state = ParseState::Engine;
                    }
                },
                ParseState::Engine => {
                    match parse_engine(line) {
                        Some(engine) => {
                            if engine.is_merge() {
                                self.table.child_names = union_members(&engine.descriptor);
                            }
                            self.table.engine = engine;
                            self.state = ParseState::Done;
                        }
                        None => {
                            tracing::debug!(table = %self.table.name, line, "Skipping unrecognized line");
                        }
                    }
                    return Ok(self.state);
                }
                ParseState::Done => return Ok(self.state),
            }
        }
    }

    /// Finish parsing, failing unless the definition was complete
    pub fn finish(self, ddl: &str) -> Result<Table> {
        if self.state != ParseState::Done {
            return Err(Error::malformed(
                format!("table definition ended in the {} state", self.state),
                ddl,
            ));
        }

        let mut table = self.table;
        table.raw_ddl = ddl.to_string();
        Ok(table)
    }

    fn parse_header(&mut self, line: &str) -> Result<()> {
        let caps = HEADER_RE
            .captures(line)
            .ok_or_else(|| Error::malformed("expected a CREATE TABLE header", line))?;

        self.table.name = caps[1].to_string();
        let rest = caps.get(2).map_or("", |m| m.as_str());

        if let Some(like) = LIKE_RE.captures(rest) {
            self.table.like_source = Some(like[1].to_string());
            self.state = ParseState::Done;
        } else {
            self.state = ParseState::Columns;
        }
        Ok(())
    }
}

/// Parse one `CREATE TABLE` statement
pub fn parse_table(ddl: &str) -> Result<Table> {
    let ddl = ddl.replace('\r', "");
    let mut parser = TableParser::new();

    for line in ddl.lines() {
        if parser.feed(line)? == ParseState::Done {
            break;
        }
    }

    let table = parser.finish(&ddl)?;
    tracing::debug!(
        table = %table.name,
        columns = table.columns.len(),
        indexes = table.indexes.len(),
        "Parsed table definition"
    );
    Ok(table)
}

/// Cut the `CREATE TABLE` statements out of a dump.
///
/// A statement runs until the first line that ends with `;`. Anything
/// between statements (comments, `SET`, `DROP TABLE IF EXISTS`, data) is
/// ignored.
pub fn split_dump(text: &str) -> Vec<String> {
    let text = text.replace('\r', "");
    DUMP_TABLE_RE
        .find_iter(&text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Parse every `CREATE TABLE` statement found in a dump
pub fn parse_dump(text: &str) -> Result<Vec<Table>> {
    split_dump(text).iter().map(|ddl| parse_table(ddl)).collect()
}

/// Table name from the header line of a statement
pub fn header_name(ddl: &str) -> Option<String> {
    let first = ddl.lines().find(|line| !line.trim().is_empty())?;
    HEADER_RE.captures(first).map(|caps| caps[1].to_string())
}

fn parse_column(line: &str) -> Option<Column> {
    let caps = COLUMN_RE.captures(line)?;
    Some(Column::new(&caps[1], caps[2].trim()))
}

fn parse_index(line: &str) -> Option<Index> {
    let caps = INDEX_RE.captures(line)?;

    let prefix = caps.get(1).map_or("", |m| m.as_str());
    let kind = IndexKind::from_keyword(&format!("{}KEY", prefix))?;
    let columns = balanced_prefix(caps.get(3)?.as_str())?;

    let name = match kind {
        IndexKind::Primary => "",
        _ => caps.get(2).map_or("", |m| m.as_str()),
    };
    Some(Index::new(name, kind, columns))
}

fn parse_engine(line: &str) -> Option<Engine> {
    let caps = ENGINE_RE.captures(line)?;
    Some(Engine::new(&caps[1], &caps[2]))
}

/// Names listed in a merge table's `UNION=(...)` option
pub fn union_members(descriptor: &str) -> Vec<String> {
    UNION_RE
        .captures(descriptor)
        .map(|caps| {
            QUOTED_NAME_RE
                .captures_iter(&caps[1])
                .map(|name| name[1].to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Text up to the parenthesis closing an already opened one.
///
/// Handles nested prefix lengths such as `` `name`(10) `` and ignores
/// parentheses inside quoted identifiers or strings.
fn balanced_prefix(text: &str) -> Option<&str> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '`' | '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[..i]);
                    }
                }
                _ => {}
            },
        }
    }
    None
}
