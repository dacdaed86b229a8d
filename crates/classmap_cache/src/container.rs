//! In-memory lookup containers for loaded cache entries.

use crate::error::CacheError;
use crate::key::CacheKey;
use crate::variant::{CacheVariant, ContainerKind};
use std::collections::BTreeMap;

/// Sorted key to path map.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    entries: BTreeMap<CacheKey, String>,
}

impl OrderedMap {
    /// Inserts a key, returning the previous path if one was stored.
    pub fn insert(&mut self, key: CacheKey, path: String) -> Option<String> {
        self.entries.insert(key, path)
    }

    /// Returns the path stored under `key`.
    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    /// Child edges sorted by byte.
    children: Vec<(u8, u32)>,
    value: Option<String>,
}

/// A byte trie stored as an arena of nodes.
///
/// Node 0 is the root. Edges are kept sorted so a step is a binary search.
#[derive(Debug, Clone)]
pub struct ByteTrie {
    nodes: Vec<TrieNode>,
    len: usize,
}

impl Default for ByteTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            len: 0,
        }
    }
}

impl ByteTrie {
    /// Inserts `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: &[u8], value: String) -> Option<String> {
        let mut node = 0usize;
        for &byte in key {
            node = match self.nodes[node]
                .children
                .binary_search_by_key(&byte, |&(b, _)| b)
            {
                Ok(i) => self.nodes[node].children[i].1 as usize,
                Err(i) => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(i, (byte, child as u32));
                    child
                }
            };
        }
        let previous = self.nodes[node].value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &[u8]) -> Option<&str> {
        let mut node = 0usize;
        for &byte in key {
            let children = &self.nodes[node].children;
            let i = children.binary_search_by_key(&byte, |&(b, _)| b).ok()?;
            node = children[i].1 as usize;
        }
        self.nodes[node].value.as_deref()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone)]
enum Store {
    Map(OrderedMap),
    Trie(ByteTrie),
}

/// The loaded cache: a container of the artifact's variant.
///
/// Lookups take the raw type name and derive the stored key through the
/// variant's key scheme, so callers never see checksums.
#[derive(Debug, Clone)]
pub struct LookupTable {
    variant: CacheVariant,
    store: Store,
}

impl LookupTable {
    /// Creates the empty container for `variant`.
    pub fn new(variant: CacheVariant) -> Self {
        let store = match variant.container() {
            ContainerKind::OrderedMap => Store::Map(OrderedMap::default()),
            ContainerKind::Trie => Store::Trie(ByteTrie::default()),
        };
        Self { variant, store }
    }

    /// The variant this table was built for.
    pub fn variant(&self) -> CacheVariant {
        self.variant
    }

    /// Stores an already-encoded key.
    pub fn insert(&mut self, key: CacheKey, path: String) -> Result<(), CacheError> {
        let scheme = self.variant.scheme();
        if !scheme.accepts(&key) {
            return Err(CacheError::SchemeMismatch {
                key: format!("{key:?}"),
                scheme: scheme.name(),
            });
        }
        match &mut self.store {
            Store::Map(map) => {
                map.insert(key, path);
            }
            Store::Trie(trie) => {
                trie.insert(&key.trie_bytes(), path);
            }
        }
        Ok(())
    }

    /// Returns the relative path recorded for `type_name`.
    pub fn get(&self, type_name: &str) -> Option<&str> {
        let key = self.variant.scheme().key_for(type_name);
        match &self.store {
            Store::Map(map) => map.get(&key),
            Store::Trie(trie) => trie.get(&key.trie_bytes()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Map(map) => map.len(),
            Store::Trie(trie) => trie.len(),
        }
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(variant: CacheVariant) -> LookupTable {
        let mut table = LookupTable::new(variant);
        let scheme = variant.scheme();
        for (name, path) in [
            ("Mage", "app/Mage.php"),
            ("Mage_Core_Model_App", "app/code/core/Mage/Core/Model/App.php"),
            ("Mage_Core", "app/code/core/Mage/Core.php"),
        ] {
            table
                .insert(scheme.key_for(name), path.to_string())
                .unwrap();
        }
        table
    }

    #[test]
    fn every_variant_answers_by_type_name() {
        for variant in CacheVariant::ALL {
            let table = filled(variant);
            assert_eq!(table.len(), 3, "{variant}");
            assert_eq!(table.get("Mage"), Some("app/Mage.php"), "{variant}");
            assert_eq!(
                table.get("Mage_Core_Model_App"),
                Some("app/code/core/Mage/Core/Model/App.php"),
                "{variant}"
            );
            assert_eq!(table.get("Mage_Cor"), None, "{variant}");
            assert_eq!(table.get("Mage_Core_Model_Apps"), None, "{variant}");
        }
    }

    #[test]
    fn wrong_key_shape_is_rejected() {
        let mut table = LookupTable::new(CacheVariant::MapHashed);
        let err = table
            .insert(CacheKey::Name("Foo".into()), "Foo.php".into())
            .unwrap_err();
        assert!(matches!(err, CacheError::SchemeMismatch { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn trie_prefix_is_not_a_hit() {
        let mut trie = ByteTrie::default();
        trie.insert(b"abc", "x".into());
        assert_eq!(trie.get(b"ab"), None);
        assert_eq!(trie.get(b"abc"), Some("x"));
        assert_eq!(trie.get(b""), None);
    }

    #[test]
    fn trie_replace_keeps_len() {
        let mut trie = ByteTrie::default();
        assert_eq!(trie.insert(b"k", "a".into()), None);
        assert_eq!(trie.insert(b"k", "b".into()), Some("a".to_string()));
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.get(b"k"), Some("b"));
    }

    #[test]
    fn trie_empty_key() {
        let mut trie = ByteTrie::default();
        trie.insert(b"", "root".into());
        assert_eq!(trie.get(b""), Some("root"));
    }
}
