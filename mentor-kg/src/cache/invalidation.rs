//! Cache invalidation events
//!
//! The cache only knows three ways an entry can leave it early: TTL expiry
//! observed on lookup, LRU eviction at capacity, and explicit invalidation.
//! Graph writes always invalidate the whole cache, so there is no
//! dependency tracking between entries and the concepts they were built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason for cache invalidation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvalidationReason {
    /// Entry expired based on TTL
    Expired,

    /// Evicted to stay under `max_entries`
    Capacity,

    /// Manual invalidation by caller
    Manual,

    /// A concept or edge write committed
    GraphWrite {
        /// Operation that triggered the clear, e.g. `update_concept`
        operation: String,
        /// Graph version after the write
        version: u64,
    },
}

impl fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidationReason::Expired => write!(f, "TTL expired"),
            InvalidationReason::Capacity => write!(f, "capacity eviction"),
            InvalidationReason::Manual => write!(f, "manual invalidation"),
            InvalidationReason::GraphWrite { operation, version } => {
                write!(f, "graph write {} (version {})", operation, version)
            }
        }
    }
}

/// Record of one invalidation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidationEvent {
    /// Reason for invalidation
    pub reason: InvalidationReason,

    /// When the invalidation occurred
    pub timestamp: DateTime<Utc>,

    /// Number of entries removed
    pub cleared: usize,
}

impl InvalidationEvent {
    /// Create a new invalidation event
    pub fn new(reason: InvalidationReason, cleared: usize) -> Self {
        Self {
            reason,
            timestamp: Utc::now(),
            cleared,
        }
    }

    /// Replace the reason, keeping the count and timestamp
    pub fn with_reason(mut self, reason: InvalidationReason) -> Self {
        self.reason = reason;
        self
    }
}
