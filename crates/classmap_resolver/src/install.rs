//! The process-wide resolver.

use std::sync::{Arc, OnceLock};

use crate::chain::LoaderChain;
use crate::error::ResolverError;
use crate::resolver::Resolver;

static INSTALLED: OnceLock<Arc<Resolver>> = OnceLock::new();

/// Installs `resolver` as this process's resolver and registers it as the
/// fallback locator of `chain`.
///
/// Only one resolver can be installed per process; later calls fail with
/// [`ResolverError::AlreadyInstalled`] and leave `chain` untouched.
pub fn install(
    resolver: Resolver,
    chain: &mut LoaderChain,
) -> Result<Arc<Resolver>, ResolverError> {
    let resolver = Arc::new(resolver);
    INSTALLED
        .set(Arc::clone(&resolver))
        .map_err(|_| ResolverError::AlreadyInstalled)?;
    chain.register(resolver.clone());
    tracing::debug!(
        base_dir = %resolver.base_dir().display(),
        "class path resolver installed"
    );
    Ok(resolver)
}

/// The installed resolver, if any.
pub fn installed() -> Option<Arc<Resolver>> {
    INSTALLED.get().cloned()
}
