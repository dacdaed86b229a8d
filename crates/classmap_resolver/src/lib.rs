//! Runtime type-name resolution backed by a persisted class path cache.
//!
//! A [`Resolver`] answers "which file declares this type?" from the
//! generated artifact when one is present, and otherwise by probing the
//! configured include directories for the conventionally named file.
//! Fallback answers, including "not found", are memoized for the life of
//! the resolver and never written back to disk.

#![warn(missing_docs)]

pub mod chain;
pub mod error;
pub mod install;
pub mod resolver;
pub mod search;
pub mod stats;

pub use chain::{LoaderChain, TypeLocator};
pub use error::ResolverError;
pub use install::{install, installed};
pub use resolver::{Resolution, Resolver, ResolverBuilder, ResolverState};
pub use search::{IncludePathSearcher, PathSearcher};
pub use stats::{ResolverStats, StatsSnapshot};
