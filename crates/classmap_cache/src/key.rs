//! Cache key encoding and checksum collision detection.

use crate::error::CacheError;
use classmap_common::TypeChecksum;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// How type names are turned into cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyScheme {
    /// The type name itself is the key.
    RawString,
    /// The CRC-32 checksum of the type name is the key.
    Hashed,
}

impl KeyScheme {
    /// Derives the key for `type_name` under this scheme.
    ///
    /// Used at lookup time; no collision bookkeeping happens here.
    pub fn key_for(self, type_name: &str) -> CacheKey {
        match self {
            KeyScheme::RawString => CacheKey::Name(type_name.to_string()),
            KeyScheme::Hashed => CacheKey::Hashed(TypeChecksum::of(type_name)),
        }
    }

    /// Returns the lowercase name of this scheme.
    pub fn name(self) -> &'static str {
        match self {
            KeyScheme::RawString => "string",
            KeyScheme::Hashed => "hashed",
        }
    }

    /// Returns `true` if `key` is of the shape this scheme produces.
    pub fn accepts(self, key: &CacheKey) -> bool {
        matches!(
            (self, key),
            (KeyScheme::RawString, CacheKey::Name(_)) | (KeyScheme::Hashed, CacheKey::Hashed(_))
        )
    }
}

/// A key as stored in a cache container.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    /// Raw type name.
    Name(String),
    /// Checksum of the type name.
    Hashed(TypeChecksum),
}

impl CacheKey {
    /// The byte sequence a trie container walks for this key.
    ///
    /// Checksums are walked most significant byte first so that trie order
    /// matches numeric order.
    pub fn trie_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            CacheKey::Name(name) => Cow::Borrowed(name.as_bytes()),
            CacheKey::Hashed(sum) => Cow::Owned(sum.as_raw().to_be_bytes().to_vec()),
        }
    }
}

/// Encodes type names for one generation run.
///
/// Under [`KeyScheme::Hashed`] the encoder remembers which name produced
/// each checksum and refuses a second, different name with the same one.
/// Encoding the same name twice is not a collision.
#[derive(Debug)]
pub struct KeyEncoder {
    scheme: KeyScheme,
    seen: HashMap<TypeChecksum, String>,
}

impl KeyEncoder {
    /// Creates an encoder with no recorded checksums.
    pub fn new(scheme: KeyScheme) -> Self {
        Self {
            scheme,
            seen: HashMap::new(),
        }
    }

    /// The scheme this encoder produces keys for.
    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    /// Encodes `type_name`, failing on a checksum collision.
    pub fn encode(&mut self, type_name: &str) -> Result<CacheKey, CacheError> {
        let key = self.scheme.key_for(type_name);
        if let CacheKey::Hashed(sum) = key {
            match self.seen.get(&sum) {
                Some(first) if first != type_name => {
                    return Err(CacheError::KeyCollision {
                        checksum: sum.as_raw(),
                        first: first.clone(),
                        second: type_name.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    self.seen.insert(sum, type_name.to_string());
                }
            }
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Finds two distinct names with the same checksum by brute force.
    fn colliding_pair() -> (String, String) {
        let mut seen: HashMap<u32, String> = HashMap::new();
        for i in 0u32.. {
            let name = format!("Type{i}");
            let sum = TypeChecksum::of(&name).as_raw();
            if let Some(first) = seen.insert(sum, name.clone()) {
                return (first, name);
            }
        }
        unreachable!("u32 range exhausted without a collision")
    }

    #[test]
    fn raw_scheme_uses_name() {
        let key = KeyScheme::RawString.key_for("Mage_Core_Model_App");
        assert_eq!(key, CacheKey::Name("Mage_Core_Model_App".to_string()));
    }

    #[test]
    fn hashed_scheme_uses_crc32() {
        let key = KeyScheme::Hashed.key_for("123456789");
        assert_eq!(key, CacheKey::Hashed(TypeChecksum::from_raw(0xCBF4_3926)));
    }

    #[test]
    fn hashed_trie_bytes_are_big_endian() {
        let key = CacheKey::Hashed(TypeChecksum::from_raw(0x0102_0304));
        assert_eq!(key.trie_bytes().as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn accepts_matches_shape() {
        assert!(KeyScheme::RawString.accepts(&CacheKey::Name("A".into())));
        assert!(!KeyScheme::RawString.accepts(&KeyScheme::Hashed.key_for("A")));
        assert!(KeyScheme::Hashed.accepts(&KeyScheme::Hashed.key_for("A")));
    }

    #[test]
    fn same_name_twice_is_not_a_collision() {
        let mut enc = KeyEncoder::new(KeyScheme::Hashed);
        let a = enc.encode("Foo_Bar").unwrap();
        let b = enc.encode("Foo_Bar").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_names_with_same_checksum_collide() {
        let (first, second) = colliding_pair();
        let mut enc = KeyEncoder::new(KeyScheme::Hashed);
        enc.encode(&first).unwrap();
        match enc.encode(&second) {
            Err(CacheError::KeyCollision {
                first: f,
                second: s,
                checksum,
            }) => {
                assert_eq!(f, first);
                assert_eq!(s, second);
                assert_eq!(checksum, TypeChecksum::of(&first).as_raw());
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn raw_scheme_never_collides() {
        let (first, second) = colliding_pair();
        let mut enc = KeyEncoder::new(KeyScheme::RawString);
        assert!(enc.encode(&first).is_ok());
        assert!(enc.encode(&second).is_ok());
    }
}
