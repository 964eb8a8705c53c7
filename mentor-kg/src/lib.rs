//! # Mentor Knowledge Graph (mentor-kg)
//!
//! Concept graph core for a personal tutor: concepts linked by typed
//! relations, a TTL query cache, a context-pack assembler that extracts a
//! bounded prerequisite closure, and a write hook that keeps cached packs
//! from going stale.
//!
//! ## Features
//!
//! - Async-first design using tokio
//! - Generic TTL cache with LRU capacity limit and whole-cache invalidation
//! - Deterministic, deduplicated, cycle-safe context packs
//! - Graph version counter embedded in every pack cache key
//! - In-memory store with YAML/JSON snapshot files
//! - Study order and prerequisite cycle reports via petgraph
//!
//! ## Context Packs
//!
//! ```no_run
//! use mentor_kg::{Concept, Edge, MemoryGraphStore, Mentor, MentorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mentor = Mentor::new(MemoryGraphStore::new(), MentorConfig::from_env()?)?;
//!     let writer = mentor.writer();
//!
//!     writer.create_concept(Concept::new("kv-cache", "KV Cache", "Reuse past keys")).await?;
//!     writer.create_concept(Concept::new("attention", "Attention", "Weighted mixing")).await?;
//!     writer.create_edge(Edge::prerequisite("kv-cache", "attention")).await?;
//!
//!     let pack = mentor.context_pack("kv-cache", Some(10)).await?;
//!     assert_eq!(pack.item_count, 2);
//!     println!("{}", pack.render_markdown());
//!     Ok(())
//! }
//! ```
//!
//! ## Invalidation
//!
//! Writes made through [`Mentor::writer`] bump the graph version and clear
//! the cache before returning:
//!
//! ```no_run
//! use mentor_kg::{ConceptPatch, MasteryLevel, MemoryGraphStore, Mentor, MentorConfig};
//!
//! # async fn example(mentor: Mentor<MemoryGraphStore>) -> mentor_kg::Result<()> {
//! let patch = ConceptPatch {
//!     mastery: Some(MasteryLevel::Mastered),
//!     ..Default::default()
//! };
//! let committed = mentor.writer().update_concept("attention", patch).await?;
//! println!(
//!     "now at version {}, dropped {} cached packs",
//!     committed.receipt.version, committed.receipt.invalidated
//! );
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod hook;
pub mod pack;
pub mod service;

// Re-export main types for convenience
pub use cache::{
    CacheConfig, CacheConfigBuilder, CacheEntry, CacheKey, CacheKeyBuilder, CacheMetadata,
    CacheStats, InvalidationEvent, InvalidationReason, KeyKind, QueryCache, DEFAULT_TTL,
};
pub use config::{MentorConfig, DEFAULT_BUDGET};
pub use error::{KgError, Result};
pub use graph::{
    prerequisite_cycles, study_order, Concept, ConceptId, ConceptPatch, DeletedConcept, Edge,
    GraphAccessor, GraphSnapshot, GraphStore, MasteryLevel, MemoryGraphStore, RelationKind,
};
pub use hook::{Committed, GraphVersion, InvalidatingStore, WriteReceipt};
pub use pack::{ContextPack, ContextPackAssembler, PackItem, DEFAULT_MAX_BUDGET};
pub use service::Mentor;
