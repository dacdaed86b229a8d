//! Lookup counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by every lookup.
#[derive(Debug, Default)]
pub struct ResolverStats {
    cache_hits: AtomicU64,
    fallback_hits: AtomicU64,
    misses: AtomicU64,
    searches: AtomicU64,
}

/// A point-in-time copy of [`ResolverStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Lookups answered from the persisted cache or from memoized results.
    pub cache_hits: u64,
    /// Lookups answered by a fresh filesystem search that found the file.
    pub fallback_hits: u64,
    /// Lookups that returned not-found, memoized or fresh.
    pub misses: u64,
    /// Filesystem searches performed.
    pub searches: u64,
}

impl ResolverStats {
    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fallback_hits: self.fallback_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
        }
    }
}
