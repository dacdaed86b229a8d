//! Error types for resolver setup.

use classmap_config::ConfigError;

/// Errors raised while constructing or installing a resolver.
///
/// Lookups themselves never fail; an absent type is a
/// [`Resolution::NotFound`](crate::Resolution::NotFound).
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// Configuration or base directory could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A resolver has already been installed in this process.
    #[error("a class path resolver is already installed in this process")]
    AlreadyInstalled,
}
