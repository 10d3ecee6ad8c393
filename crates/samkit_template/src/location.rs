//! Source locations and the dotted/bracketed node paths they are keyed by.
//!
//! Paths use `.` between mapping keys and `[n]` for sequence indices, with a
//! directive's canonical name appended as a key segment, e.g.
//! `Resources.MyFunc.Properties.Role.Fn::GetAtt`. The document root is the
//! empty path.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A 1-based line and column in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Locations of every node in a normalized document, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTable {
    entries: BTreeMap<String, Location>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a location. The first location recorded for a path wins.
    pub fn insert(&mut self, path: impl Into<String>, location: Location) {
        self.entries.entry(path.into()).or_insert(location);
    }

    pub fn get(&self, path: &str) -> Option<Location> {
        self.entries.get(path).copied()
    }

    /// Location of `path` or of its closest recorded ancestor.
    pub fn nearest(&self, path: &str) -> Option<Location> {
        let mut current = path;
        loop {
            if let Some(loc) = self.get(current) {
                return Some(loc);
            }
            if current.is_empty() {
                return None;
            }
            current = parent_path(current);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Location)> {
        self.entries.iter().map(|(path, loc)| (path.as_str(), *loc))
    }
}

/// Extend `path` with a mapping key.
pub fn key_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Extend `path` with a sequence index.
pub fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// Human-readable path, naming the root explicitly.
pub fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

fn parent_path(path: &str) -> &str {
    if path.ends_with(']') {
        if let Some(open) = path.rfind('[') {
            return &path[..open];
        }
    }
    match path.rfind('.') {
        Some(dot) => &path[..dot],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        let p = key_path("", "Resources");
        let p = key_path(&p, "MyFunc");
        let p = key_path(&p, "Events");
        let p = index_path(&p, 2);
        assert_eq!(p, "Resources.MyFunc.Events[2]");
        assert_eq!(key_path(&p, "Fn::GetAtt"), "Resources.MyFunc.Events[2].Fn::GetAtt");
    }

    #[test]
    fn test_nearest_walks_up_to_ancestor() {
        let mut table = LocationTable::new();
        table.insert("Resources", Location::new(2, 1));
        table.insert("Resources.MyFunc", Location::new(3, 3));

        assert_eq!(
            table.nearest("Resources.MyFunc.Properties[0].Handler"),
            Some(Location::new(3, 3))
        );
        assert_eq!(table.nearest("Outputs"), None);
    }

    #[test]
    fn test_first_insert_wins() {
        let mut table = LocationTable::new();
        table.insert("A", Location::new(1, 1));
        table.insert("A", Location::new(9, 9));
        assert_eq!(table.get("A"), Some(Location::new(1, 1)));
    }
}
