//! Class path cache encoding, persistence and generation.
//!
//! A generation run encodes every entry of a [`ClassMap`](classmap_common::ClassMap)
//! under the key scheme of the chosen [`CacheVariant`], checks hashed keys for
//! collisions, and streams the entries into a binary artifact. At runtime the
//! artifact is read back wholesale into a [`LookupTable`] that answers
//! lookups by raw type name regardless of the key encoding.

#![warn(missing_docs)]

pub mod artifact;
pub mod container;
pub mod error;
pub mod generate;
pub mod key;
pub mod variant;

pub use artifact::{
    clear_artifact, load_artifact, read_artifact, ArtifactHeader, ArtifactWriter, PersistedCache,
};
pub use container::{ByteTrie, LookupTable, OrderedMap};
pub use error::CacheError;
pub use generate::{generate, write_class_map, GenerateReport, GENERATOR_VERSION};
pub use key::{CacheKey, KeyEncoder, KeyScheme};
pub use variant::{CacheVariant, ContainerKind};
