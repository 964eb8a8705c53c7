//! Cache entry management with TTL support

use crate::cache::types::CacheKey;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A cache entry with an absolute expiry instant.
///
/// Entries are owned by the cache store and never handed out; lookups
/// return a clone of `value`.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cache key
    pub key: CacheKey,

    /// The cached value
    pub value: V,

    /// Entry metadata
    pub metadata: CacheMetadata,
}

impl<V> CacheEntry<V> {
    /// Create a new entry expiring `ttl` from now
    pub fn new(key: CacheKey, value: V, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = expiry_after(now, ttl);

        Self {
            key,
            value,
            metadata: CacheMetadata {
                created_at: now,
                accessed_at: now,
                expires_at,
                access_count: 0,
            },
        }
    }

    /// Create a new entry with an explicit expiration time
    pub fn with_expiration(key: CacheKey, value: V, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();

        Self {
            key,
            value,
            metadata: CacheMetadata {
                created_at: now,
                accessed_at: now,
                expires_at,
                access_count: 0,
            },
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expired means `now >= expires_at`; the expiry instant itself is already stale.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.metadata.expires_at
    }

    /// Get time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now();
        if self.is_expired_at(now) {
            None
        } else {
            (self.metadata.expires_at - now).to_std().ok()
        }
    }

    /// Mark the entry as accessed (updates access time and count)
    pub fn mark_accessed(&mut self) {
        self.metadata.accessed_at = Utc::now();
        self.metadata.access_count += 1;
    }

    /// Get the age of the entry
    pub fn age(&self) -> Duration {
        (Utc::now() - self.metadata.created_at)
            .to_std()
            .unwrap_or(Duration::from_secs(0))
    }
}

/// Metadata associated with a cache entry
#[derive(Debug, Clone)]
pub struct CacheMetadata {
    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// Last access time (for LRU tracking)
    pub accessed_at: DateTime<Utc>,

    /// When the entry expires
    pub expires_at: DateTime<Utc>,

    /// Number of times this entry has been served
    pub access_count: u64,
}

// Saturates instead of failing: a TTL too large for chrono is effectively "never".
fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_cache_entry_creation() {
        let entry = CacheEntry::new("test_key".to_string(), 42u32, Duration::from_secs(3600));

        assert_eq!(entry.key, "test_key");
        assert_eq!(entry.value, 42);
        assert!(!entry.is_expired());
        assert_eq!(entry.metadata.access_count, 0);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test".to_string(), "value", Duration::from_millis(100));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(150));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiry_instant_is_inclusive() {
        let expires_at = Utc::now() + chrono::Duration::seconds(10);
        let entry = CacheEntry::with_expiration("k".to_string(), (), expires_at);

        assert!(!entry.is_expired_at(expires_at - chrono::Duration::milliseconds(1)));
        assert!(entry.is_expired_at(expires_at));
        assert!(entry.is_expired_at(expires_at + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_mark_accessed() {
        let mut entry = CacheEntry::new("test".to_string(), "value", Duration::from_secs(3600));

        let initial_time = entry.metadata.accessed_at;
        sleep(Duration::from_millis(10));
        entry.mark_accessed();

        assert_eq!(entry.metadata.access_count, 1);
        assert!(entry.metadata.accessed_at > initial_time);
    }

    #[test]
    fn test_huge_ttl_does_not_panic() {
        let entry = CacheEntry::new("k".to_string(), 1, Duration::from_secs(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_time_until_expiration() {
        let entry = CacheEntry::new("test".to_string(), "value", Duration::from_secs(3600));

        let time_left = entry.time_until_expiration();
        assert!(time_left.is_some());
        assert!(time_left.unwrap() <= Duration::from_secs(3600));
    }

    #[test]
    fn test_age() {
        let entry = CacheEntry::new("test".to_string(), "value", Duration::from_secs(3600));

        sleep(Duration::from_millis(10));
        assert!(entry.age() >= Duration::from_millis(10));
    }
}
