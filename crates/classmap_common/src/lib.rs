//! Shared foundational types for the class path cache toolchain.
//!
//! This crate provides the class map produced by a scan, the 32-bit type-name
//! checksum used for hashed cache keys, the canonical type-name to file-path
//! derivation, and content hashing for artifact integrity checks.

#![warn(missing_docs)]

pub mod checksum;
pub mod class_map;
pub mod hash;
pub mod naming;

pub use checksum::{crc32, TypeChecksum};
pub use class_map::{ClassEntry, ClassMap};
pub use hash::{ContentHash, ContentHasher};
pub use naming::{file_name_for_type, NAME_DELIMITERS};
