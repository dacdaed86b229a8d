//! The four cache variants: container kind crossed with key scheme.

use crate::error::CacheError;
use crate::key::KeyScheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The in-memory structure entries are loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Sorted key/value map.
    OrderedMap,
    /// Byte-indexed trie.
    Trie,
}

/// A cache variant selected at generation time and recorded in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheVariant {
    /// Ordered map keyed by raw type name.
    MapString,
    /// Ordered map keyed by type-name checksum.
    MapHashed,
    /// Trie keyed by raw type name.
    TrieString,
    /// Trie keyed by type-name checksum.
    TrieHashed,
}

impl CacheVariant {
    /// Every variant, in the order they are listed in usage text.
    pub const ALL: [CacheVariant; 4] = [
        CacheVariant::MapHashed,
        CacheVariant::MapString,
        CacheVariant::TrieHashed,
        CacheVariant::TrieString,
    ];

    /// The command-line name of this variant.
    pub fn name(self) -> &'static str {
        match self {
            CacheVariant::MapString => "map-string",
            CacheVariant::MapHashed => "map-hashed",
            CacheVariant::TrieString => "trie-string",
            CacheVariant::TrieHashed => "trie-hashed",
        }
    }

    /// The key scheme of this variant.
    pub fn scheme(self) -> KeyScheme {
        match self {
            CacheVariant::MapString | CacheVariant::TrieString => KeyScheme::RawString,
            CacheVariant::MapHashed | CacheVariant::TrieHashed => KeyScheme::Hashed,
        }
    }

    /// The container kind of this variant.
    pub fn container(self) -> ContainerKind {
        match self {
            CacheVariant::MapString | CacheVariant::MapHashed => ContainerKind::OrderedMap,
            CacheVariant::TrieString | CacheVariant::TrieHashed => ContainerKind::Trie,
        }
    }
}

impl fmt::Display for CacheVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheVariant {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CacheError::UnknownVariant {
                name: s.to_string(),
            })
    }
}
