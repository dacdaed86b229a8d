//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache generation and loading.
///
/// Loading is fail-safe at the resolver level: any of these results in the
/// resolver running without a persisted cache rather than a hard failure.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact has an invalid or missing header.
    #[error("invalid artifact header in {path}: {reason}")]
    InvalidHeader {
        /// The artifact file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The artifact body does not decode into the entries the trailer
    /// announces.
    #[error("corrupt artifact body in {path}: {reason}")]
    Corrupt {
        /// The artifact file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// The stored checksum does not match the computed checksum of the body.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The artifact file path.
        path: PathBuf,
        /// The checksum recorded in the trailer.
        expected: String,
        /// The checksum computed from the body.
        actual: String,
    },

    /// The artifact format version does not match the current version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The artifact file path.
        path: PathBuf,
        /// The expected format version.
        expected: u32,
        /// The actual format version found in the file.
        actual: u32,
    },

    /// Two distinct type names share a 32-bit checksum.
    #[error(
        "crc32 hash collision between {first} and {second} classes (checksum {checksum}); \
         use a string-keyed cache type instead"
    )]
    KeyCollision {
        /// The shared checksum.
        checksum: u32,
        /// The type name encoded first.
        first: String,
        /// The type name that collided with it.
        second: String,
    },

    /// A key does not match the key scheme of the table it is inserted into.
    #[error("key {key} does not match the {scheme} key scheme")]
    SchemeMismatch {
        /// Debug rendering of the offending key.
        key: String,
        /// Name of the table's key scheme.
        scheme: &'static str,
    },

    /// A cache variant name was not recognized.
    #[error("unsupported cache type '{name}'")]
    UnknownVariant {
        /// The name that was given.
        name: String,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
