//! Concept graph model and store seams
//!
//! Concepts are nodes; edges are directed and typed (`prerequisite`,
//! `example`, `related`). A prerequisite edge `a -> b` means `b` must be
//! understood before `a`.

pub mod accessor;
pub mod analysis;
pub mod memory;
pub mod snapshot;
pub mod types;

pub use accessor::{DeletedConcept, GraphAccessor, GraphStore};
pub use analysis::{prerequisite_cycles, study_order};
pub use memory::MemoryGraphStore;
pub use snapshot::GraphSnapshot;
pub use types::{Concept, ConceptId, ConceptPatch, Edge, MasteryLevel, RelationKind};
