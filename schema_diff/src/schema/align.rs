//! Ordered alignment of columns and indexes
//!
//! Works out which items of an old list have to be dropped, added or
//! modified to turn it into a new list, and where each added or modified
//! item goes so that MySQL's `FIRST` / `AFTER` placement reproduces the new
//! order.
//!
//! The walk is greedy: a cursor into the old list only moves forward and
//! points at the next surviving old item (the anchor). A new item equal to
//! the anchor consumes it; any other surviving item is moved in front of the
//! anchor; anything else is added there.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::schema::types::{Column, Index};

/// Something the aligner can match by name
pub trait Keyed {
    /// Identity across versions
    fn key(&self) -> &str;

    /// Whether two items with the same key are identical
    fn same_definition(&self, other: &Self) -> bool;
}

impl Keyed for Column {
    fn key(&self) -> &str {
        &self.name
    }

    fn same_definition(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor
    }
}

impl Keyed for Index {
    fn key(&self) -> &str {
        &self.name
    }

    fn same_definition(&self, other: &Self) -> bool {
        self.kind == other.kind && self.columns == other.columns
    }
}

/// Placement clause of `ADD` / `MODIFY COLUMN`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    First,
    After(String),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::First => f.write_str("FIRST"),
            Position::After(name) => write!(f, "AFTER `{}`", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Modify,
}

/// An added or modified item and where it belongs
#[derive(Debug, Clone, PartialEq)]
pub struct Change<'a, T> {
    pub kind: ChangeKind,
    /// The new definition
    pub item: &'a T,
    /// The old definition, for modifications
    pub previous: Option<&'a T>,
    pub position: Position,
}

/// Result of aligning two lists.
///
/// `changes` are in emission order: replaying them after the drops turns
/// the old order into the new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment<'a, T> {
    pub drops: Vec<&'a T>,
    pub changes: Vec<Change<'a, T>>,
}

impl<'a, T> Alignment<'a, T> {
    pub fn adds(&self) -> impl Iterator<Item = &Change<'a, T>> {
        self.changes.iter().filter(|c| c.kind == ChangeKind::Add)
    }

    pub fn modifies(&self) -> impl Iterator<Item = &Change<'a, T>> {
        self.changes.iter().filter(|c| c.kind == ChangeKind::Modify)
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty() && self.changes.is_empty()
    }
}

/// Align two ordered lists
pub fn align<'a, T: Keyed>(old: &'a [T], new: &'a [T]) -> Alignment<'a, T> {
    let new_keys: HashSet<&str> = new.iter().map(|item| item.key()).collect();

    // Drop pass
    let mut ignored: HashSet<&str> = HashSet::new();
    let mut survivors: HashMap<&str, &'a T> = HashMap::new();
    let mut drops = Vec::new();
    for item in old {
        if new_keys.contains(item.key()) {
            survivors.insert(item.key(), item);
        } else {
            ignored.insert(item.key());
            drops.push(item);
        }
    }

    // Align pass
    let mut changes = Vec::new();
    let mut cursor = 0;
    let mut last: Option<&str> = None;
    for item in new {
        while cursor < old.len() && ignored.contains(old[cursor].key()) {
            cursor += 1;
        }

        let position = match last {
            None => Position::First,
            Some(name) => Position::After(name.to_string()),
        };
        last = Some(item.key());

        let change = match old.get(cursor) {
            None => Some((ChangeKind::Add, None)),
            Some(anchor) if anchor.key() != item.key() => match survivors.get(item.key()) {
                Some(&previous) => {
                    ignored.insert(item.key());
                    Some((ChangeKind::Modify, Some(previous)))
                }
                None => Some((ChangeKind::Add, None)),
            },
            Some(anchor) => {
                cursor += 1;
                if anchor.same_definition(item) {
                    None
                } else {
                    Some((ChangeKind::Modify, Some(anchor)))
                }
            }
        };

        if let Some((kind, previous)) = change {
            changes.push(Change {
                kind,
                item,
                previous,
                position,
            });
        }
    }

    Alignment { drops, changes }
}

/// Align two column lists
pub fn align_columns<'a>(old: &'a [Column], new: &'a [Column]) -> Alignment<'a, Column> {
    align(old, new)
}

/// Index changes, already split into what MySQL can express.
///
/// Indexes cannot be modified in place, so a changed index appears in both
/// lists: its old definition under `drops` and its new one under `adds`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexChanges<'a> {
    pub drops: Vec<&'a Index>,
    pub adds: Vec<&'a Index>,
}

impl IndexChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty() && self.adds.is_empty()
    }
}

/// Align two index lists
pub fn align_indexes<'a>(old: &'a [Index], new: &'a [Index]) -> IndexChanges<'a> {
    let alignment = align(old, new);
    let mut changes = IndexChanges {
        drops: alignment.drops,
        adds: Vec::new(),
    };

    for change in alignment.changes {
        match (change.kind, change.previous) {
            (ChangeKind::Modify, Some(previous)) => {
                // Index order carries no meaning
                if previous.same_definition(change.item) {
                    continue;
                }
                changes.drops.push(previous);
                changes.adds.push(change.item);
            }
            _ => changes.adds.push(change.item),
        }
    }

    changes
}
