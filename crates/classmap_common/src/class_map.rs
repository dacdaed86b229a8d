//! The type-name to relative-path map produced by one generation run.

use std::collections::HashMap;

/// One declared type and the relative path of the file declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Fully-qualified type name as written in the declaration.
    pub name: String,
    /// Path relative to the base directory, `/`-separated.
    pub path: String,
}

/// Mapping from type name to relative file path, in first-seen order.
///
/// A type name maps to at most one path. Inserting a name that is already
/// present replaces its path in place (last write wins) and keeps the
/// position of the first insertion, so serialization order is stable.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    entries: Vec<ClassEntry>,
    index: HashMap<String, usize>,
}

impl ClassMap {
    /// Creates an empty class map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` as declared in `path`.
    ///
    /// Returns the previously recorded path when the name was already
    /// present.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) -> Option<String> {
        let name = name.into();
        let path = path.into();
        match self.index.get(&name) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx].path, path)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(ClassEntry { name, path });
                None
            }
        }
    }

    /// Returns the relative path recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&idx| self.entries[idx].path.as_str())
    }

    /// Iterates the entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassEntry> {
        self.entries.iter()
    }

    /// Returns the number of distinct type names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no type has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ClassMap {
    type Item = &'a ClassEntry;
    type IntoIter = std::slice::Iter<'a, ClassEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
