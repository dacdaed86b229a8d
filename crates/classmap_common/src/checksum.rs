//! 32-bit type-name checksum used by hashed cache keys.
//!
//! CRC-32 (IEEE 802.3, reflected, init and final XOR `0xFFFF_FFFF`), the
//! same checksum zlib and most scripting runtimes expose as `crc32`. The
//! generator and the runtime resolver must agree on it bit for bit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reflected CRC-32 polynomial (IEEE 802.3).
const CRC32_POLY_REFLECTED: u32 = 0xEDB8_8320;

/// Precomputed reflected CRC-32 lookup table (256 entries).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ CRC32_POLY_REFLECTED;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Computes CRC-32 over the given byte slice.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        let idx = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[idx];
    }
    crc ^ 0xFFFF_FFFF
}

/// The 32-bit checksum of a type name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeChecksum(u32);

impl TypeChecksum {
    /// Computes the checksum of a type name's UTF-8 bytes.
    pub fn of(type_name: &str) -> Self {
        Self(crc32(type_name.as_bytes()))
    }

    /// Wraps an already-computed checksum value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the checksum value.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TypeChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeChecksum({:#010x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_empty() {
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn crc32_check_value() {
        // Standard CRC-32 check value.
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn crc32_known_sentence() {
        assert_eq!(
            crc32(b"The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
    }

    #[test]
    fn crc32_table_first_entries() {
        assert_eq!(CRC32_TABLE[0], 0);
        assert_eq!(CRC32_TABLE[1], 0x7707_3096);
    }

    #[test]
    fn checksum_of_type_name_is_stable() {
        let a = TypeChecksum::of("Mage_Core_Model_App");
        let b = TypeChecksum::of("Mage_Core_Model_App");
        assert_eq!(a, b);
        assert_ne!(a, TypeChecksum::of("Mage_Core_Model_Config"));
    }

    #[test]
    fn raw_roundtrip() {
        let c = TypeChecksum::of("Varien_Object");
        assert_eq!(TypeChecksum::from_raw(c.as_raw()), c);
    }

    #[test]
    fn debug_is_hex() {
        let c = TypeChecksum::from_raw(0xCBF4_3926);
        assert_eq!(format!("{c:?}"), "TypeChecksum(0xcbf43926)");
        assert_eq!(format!("{c}"), "3421780262");
    }
}
