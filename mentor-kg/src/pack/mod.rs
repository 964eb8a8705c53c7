//! Context packs: bounded, ordered, deduplicated extracts of a concept's
//! prerequisite closure, ready to embed in a tutoring prompt.
//!
//! ```no_run
//! use mentor_kg::{Concept, ContextPackAssembler, Edge, GraphStore, GraphVersion, MemoryGraphStore, QueryCache};
//! use std::sync::Arc;
//!
//! # async fn example() -> mentor_kg::Result<()> {
//! let store = Arc::new(MemoryGraphStore::new());
//! store.create_concept(Concept::new("kv-cache", "KV Cache", "")).await?;
//! store.create_concept(Concept::new("attention", "Attention", "")).await?;
//! store.create_edge(Edge::prerequisite("kv-cache", "attention")).await?;
//!
//! let assembler = ContextPackAssembler::new(
//!     store,
//!     Arc::new(QueryCache::new(Default::default())),
//!     Arc::new(GraphVersion::new()),
//! );
//! let pack = assembler.assemble("kv-cache", 10).await?;
//! println!("{}", pack.render_markdown());
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod types;

pub use assembler::{ContextPackAssembler, DEFAULT_MAX_BUDGET};
pub use types::{ContextPack, PackItem};
