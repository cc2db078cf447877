//! Per-entry TTL cache for rerank results.
//!
//! Backed by a bounded `moka` sync cache; each entry carries its own TTL and is
//! never returned after expiry. Process-local only — a distributed deployment
//! would swap this for a shared key-value store behind the same call contract.


use moka::{Expiry, sync::Cache};
use std::time::{Duration, Instant};

/// Default max entries in the rerank cache.
pub const DEFAULT_RERANK_CACHE_CAPACITY: u64 = 10_000;

/// Version prefix baked into rerank cache keys. Bump when the rerank contract
/// or row shape changes so stale entries stop matching.
pub const RERANK_KEY_SCHEMA_VERSION: u32 = 2;

/// Builds the cache key for a rerank result from the fields that determine it.
pub fn rerank_cache_key(summary: &str, min_gpa: Option<f32>, k: usize) -> String {
    let gpa = min_gpa.map(|g| g.to_string()).unwrap_or_default();
    let material = format!("v{RERANK_KEY_SCHEMA_VERSION}|{summary}|{gpa}|{k}");
    blake3::hash(material.as_bytes()).to_hex().to_string()
}

#[derive(Clone)]
struct Expiring<V> {
    value: V,
    ttl: Duration,
}

struct PerEntryExpiry;

impl<K, V> Expiry<K, Expiring<V>> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &K,
        value: &Expiring<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded key-value cache where every entry carries its own TTL.
pub struct TtlCache<V> {
    entries: Cache<String, Expiring<V>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RERANK_CACHE_CAPACITY)
    }

    /// Creates a cache with a max entry capacity (LRU-style eviction on top of TTL).
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryExpiry)
                .build(),
        }
    }

    /// Returns the value for `key`, or `None` when absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).map(|e| e.value)
    }

    /// Inserts `value` under `key`, superseding any previous entry.
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(key.into(), Expiring { value, ttl });
    }

    /// Removes an entry.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Returns the approximate number of live entries.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Returns `true` when the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
