//! Query cache store with TTL expiry and LRU eviction

use crate::cache::{
    config::CacheConfig,
    entry::CacheEntry,
    invalidation::{InvalidationEvent, InvalidationReason},
    types::{CacheKey, CacheStats},
};
use crate::error::Result;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Key/value cache with per-entry TTL and a whole-cache clear.
///
/// Every operation is total. Expired entries are dropped on the lookup
/// that observes them; there is no background sweep.
///
/// The lock is held only for the duration of a single map operation and is
/// never held across an `.await` on anything else, so callers working on
/// different keys never wait on each other beyond that.
pub struct QueryCache<V> {
    /// Cache configuration
    config: CacheConfig,

    /// Internal storage
    store: RwLock<CacheStore<V>>,
}

/// Internal cache storage
struct CacheStore<V> {
    /// Main storage: key -> entry
    entries: HashMap<CacheKey, CacheEntry<V>>,

    /// LRU tracking: front is least recently used
    lru_queue: VecDeque<CacheKey>,

    /// Current cache statistics
    stats: CacheStats,
}

impl<V> CacheStore<V> {
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru_queue.retain(|k| k != key);
        Some(entry)
    }

    fn touch(&mut self, key: &str) {
        self.lru_queue.retain(|k| k != key);
        self.lru_queue.push_back(key.to_string());
    }
}

impl<V: Clone> QueryCache<V> {
    /// Create a new cache with the given configuration
    pub fn new(config: CacheConfig) -> Self {
        debug!("Initializing query cache with config: {:?}", config);

        Self {
            config,
            store: RwLock::new(CacheStore {
                entries: HashMap::new(),
                lru_queue: VecDeque::new(),
                stats: CacheStats::default(),
            }),
        }
    }

    /// Create a cache after validating its configuration
    pub fn try_new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a cache with default settings and a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(CacheConfig::builder().default_ttl(ttl).build())
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Store `value` under `key` using the configured default TTL
    pub async fn insert(&self, key: impl Into<CacheKey>, value: V) {
        let ttl = self.config.ttl_with_jitter();
        self.set(key, value, ttl).await;
    }

    /// Store `value` with `expires_at = now + ttl`, overwriting any previous entry
    pub async fn set(&self, key: impl Into<CacheKey>, value: V, ttl: Duration) {
        let key = key.into();
        let entry = CacheEntry::new(key.clone(), value, ttl);

        let mut store = self.store.write().await;

        if store.entries.contains_key(&key) {
            debug!("Updating existing cache entry: {}", key);
        } else {
            while store.entries.len() >= self.config.max_entries {
                let Some(oldest) = store.lru_queue.pop_front() else {
                    break;
                };
                debug!("Evicting entry due to max_entries limit: {}", oldest);
                store.entries.remove(&oldest);
                store.stats.evictions_capacity += 1;
            }
            debug!("Inserting new cache entry: {}", key);
        }

        store.entries.insert(key.clone(), entry);
        store.touch(&key);
    }

    /// Look up `key`; absent if never set or if `now >= expires_at`
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut store = self.store.write().await;
        let metrics = self.config.enable_metrics;

        let Some(expired) = store.entries.get(key).map(|entry| entry.is_expired()) else {
            debug!("Cache miss: {}", key);
            if metrics {
                store.stats.misses += 1;
            }
            return None;
        };

        if expired {
            debug!("Cache entry expired: {}", key);
            store.remove_entry(key);
            store.stats.evictions_ttl += 1;
            if metrics {
                store.stats.misses += 1;
            }
            return None;
        }

        let entry = store.entries.get_mut(key)?;
        entry.mark_accessed();
        let value = entry.value.clone();

        store.touch(key);
        if metrics {
            store.stats.hits += 1;
        }

        debug!("Cache hit: {}", key);
        Some(value)
    }

    /// Check whether a live entry exists, without counting a hit or touching LRU order
    pub async fn contains_key(&self, key: &str) -> bool {
        let store = self.store.read().await;
        store
            .entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Remove a specific entry from the cache
    pub async fn remove(&self, key: &str) -> Option<V> {
        let mut store = self.store.write().await;
        let entry = store.remove_entry(key)?;
        store.stats.invalidations += 1;

        debug!("Removed cache entry: {}", key);
        Some(entry.value)
    }

    /// Clear every entry. Idempotent: a second call clears nothing.
    pub async fn invalidate_all(&self) -> InvalidationEvent {
        let mut store = self.store.write().await;

        let cleared = store.entries.len();
        store.entries.clear();
        store.lru_queue.clear();
        store.stats.invalidations += cleared as u64;
        store.stats.clears += 1;

        if cleared > 0 {
            info!("Cleared {} entries from cache", cleared);
        }
        InvalidationEvent::new(InvalidationReason::Manual, cleared)
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let mut stats = store.stats.clone();
        stats.entries = store.entries.len();
        stats
    }

    /// Number of stored entries, including expired ones not yet observed
    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    /// Check if cache is empty
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.entries.is_empty()
    }
}
