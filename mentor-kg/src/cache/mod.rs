//! # Query Cache
//!
//! In-process key/value cache that fronts expensive graph reads.
//!
//! - **TTL expiry**: every entry carries an absolute expiry instant and is
//!   dropped by the first lookup at or after it.
//! - **Whole-cache invalidation**: `invalidate_all` is the only
//!   invalidation path graph writes use.
//! - **Bounded size**: least recently used entries are evicted once
//!   `max_entries` is reached.
//!
//! ## Example
//!
//! ```rust
//! use mentor_kg::cache::{CacheConfig, QueryCache};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let config = CacheConfig::builder()
//!     .default_ttl(Duration::from_secs(30))
//!     .max_entries(1_000)
//!     .build();
//!
//! let cache: QueryCache<String> = QueryCache::new(config);
//!
//! cache.insert("context_pack:kv-cache", "cached pack".to_string()).await;
//!
//! if let Some(value) = cache.get("context_pack:kv-cache").await {
//!     println!("Cache hit: {}", value);
//! }
//!
//! cache.invalidate_all().await;
//! assert!(cache.is_empty().await);
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod invalidation;
pub mod keys;
pub mod store;
pub mod types;

pub use config::{CacheConfig, CacheConfigBuilder, DEFAULT_TTL};
pub use entry::{CacheEntry, CacheMetadata};
pub use invalidation::{InvalidationEvent, InvalidationReason};
pub use keys::{CacheKeyBuilder, KeyKind};
pub use store::QueryCache;
pub use types::{CacheKey, CacheStats};
