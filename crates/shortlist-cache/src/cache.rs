//! Generic TTL cache with lazy expiry and prefix invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::config::CacheConfig;

/// Entry stored in the cache.
#[derive(Debug, Clone)]
struct Entry<V> {
    /// Cached value.
    value: V,

    /// When this entry was inserted.
    stored_at: Instant,

    /// How long the entry stays valid.
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

/// Time-bounded key→value store.
///
/// Every entry carries its own TTL; an entry is logically absent the moment
/// its TTL elapses, regardless of when it is physically removed. Lookups
/// evict expired entries lazily, and [`cleanup`](Self::cleanup) (or the
/// spawned cleanup task) removes them proactively so memory stays bounded
/// between accesses.
///
/// Handles are cheap to clone and share one underlying map; the map sits
/// behind a `parking_lot::RwLock` since it is touched from multiple tasks.
pub struct TtlCache<V> {
    inner: Arc<RwLock<HashMap<String, Entry<V>>>>,
    config: CacheConfig,
}

impl<V> TtlCache<V> {
    /// Create a new cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Store a value under `key` with the configured default TTL,
    /// unconditionally overwriting any existing entry.
    pub fn insert(&self, key: &str, value: V) {
        self.insert_with_ttl(key, value, self.config.default_ttl);
    }

    /// Store a value under `key` with an explicit TTL.
    pub fn insert_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let mut inner = self.inner.write();
        inner.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
        trace!(key = %key, ttl_secs = ttl.as_secs(), "cache entry stored");
    }

    /// Check whether a live (non-expired) entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        let inner = self.inner.read();
        inner
            .get(key)
            .map(|entry| !entry.is_expired(Instant::now()))
            .unwrap_or(false)
    }

    /// Remove the entry for `key`. Returns whether an entry was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.inner.write().remove(key).is_some();
        if removed {
            debug!(key = %key, "cache entry invalidated");
        }
        removed
    }

    /// Remove every entry whose key satisfies the predicate.
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&self, predicate: impl Fn(&str) -> bool) -> usize {
        let mut inner = self.inner.write();
        let before = inner.len();
        inner.retain(|key, _| !predicate(key));
        let removed = before - inner.len();
        if removed > 0 {
            debug!(removed, "cache entries invalidated by predicate");
        }
        removed
    }

    /// Remove every entry in a key namespace (e.g. `"suggestions:"`).
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.invalidate_matching(|key| key.starts_with(prefix))
    }

    /// Proactively remove all expired entries.
    /// Returns the number of entries removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.write();
        let before = inner.len();
        inner.retain(|_, entry| !entry.is_expired(now));
        let removed = before - inner.len();
        if removed > 0 {
            debug!(removed, "expired cache entries cleaned up");
        }
        removed
    }

    /// Number of physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<V: Clone> TtlCache<V> {
    /// Look up a value. Expired entries are treated as misses and evicted
    /// as a side effect. Never fails; a miss means the caller falls through
    /// to the real data source.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        {
            let inner = self.inner.read();
            match inner.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => {
                    trace!(key = %key, "cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Expired: upgrade to a write lock and evict. Re-check under the
        // write lock since another task may have replaced the entry.
        let mut inner = self.inner.write();
        if let Some(entry) = inner.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
            inner.remove(key);
            trace!(key = %key, "expired cache entry evicted on access");
        }
        None
    }
}

impl<V: Send + Sync + 'static> TtlCache<V> {
    /// Spawn the periodic cleanup task if the configuration enables it.
    ///
    /// The task only removes entries that are already logically expired, so
    /// it cannot race destructively with readers or writers.
    pub fn spawn_cleanup_task(&self) -> Option<JoinHandle<()>> {
        if !self.config.enable_cleanup_task {
            return None;
        }

        let cache = self.clone();
        let interval = self.config.cleanup_interval;
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.cleanup();
            }
        }))
    }
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
