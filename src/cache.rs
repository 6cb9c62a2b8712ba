//! Time-boxed result cache keyed by request fingerprint.
//!
//! [`ResultCache`] stores explanation text produced by a provider so that
//! repeated requests for the same subject/topic are served without an
//! upstream call. Entries live for a fixed TTL (30 minutes by default);
//! an expired entry is reported absent on read rather than being
//! explicitly deleted, and a later success simply overwrites it.
//!
//! The cache is owned by the [`Orchestrator`](crate::orchestrator::Orchestrator)
//! and is not shared with any other component. Hit/miss metrics are
//! emitted at the orchestrator's call sites, where the operation is known.

use std::time::Duration;

use moka::sync::Cache;

/// Configuration for the result cache.
///
/// ```rust
/// # use mimir::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(256)
///     .ttl(Duration::from_secs(10 * 60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1,024.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 30 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_024,
            ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// In-memory TTL cache mapping request fingerprints to response text.
///
/// Thread-safe (moka handles concurrent access internally). Keys are the
/// raw fingerprint strings — the fingerprint space is tiny (one entry per
/// subject/topic pair), so no hashing layer is needed.
pub struct ResultCache {
    cache: Cache<String, String>,
}

impl ResultCache {
    /// Create a new cache from the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up the payload for a fingerprint.
    ///
    /// Returns `None` when no entry exists or the entry's TTL has elapsed.
    pub fn get(&self, fingerprint: &str) -> Option<String> {
        self.cache.get(fingerprint)
    }

    /// Store a payload, overwriting any previous entry and restarting its
    /// TTL window.
    pub fn put(&self, fingerprint: impl Into<String>, payload: impl Into<String>) {
        self.cache.insert(fingerprint.into(), payload.into());
    }
}
