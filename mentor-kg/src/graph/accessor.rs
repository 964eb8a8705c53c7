//! Read and write seams over the concept/edge store

use crate::error::Result;
use crate::graph::types::{Concept, ConceptPatch, Edge, RelationKind};
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only view of the graph consumed by the assembler.
///
/// `outgoing_edges` must return edges in an order that is stable for a
/// given graph version; pack order is derived from it.
#[async_trait]
pub trait GraphAccessor: Send + Sync {
    /// Fetch a concept, or `KgError::NotFound`
    async fn get_concept(&self, id: &str) -> Result<Concept>;

    /// Outgoing edges of `id` with the given kind, in store order.
    /// `KgError::NotFound` if `id` does not exist.
    async fn outgoing_edges(&self, id: &str, kind: RelationKind) -> Result<Vec<Edge>>;
}

#[async_trait]
impl<T: GraphAccessor + ?Sized> GraphAccessor for Arc<T> {
    async fn get_concept(&self, id: &str) -> Result<Concept> {
        (**self).get_concept(id).await
    }

    async fn outgoing_edges(&self, id: &str, kind: RelationKind) -> Result<Vec<Edge>> {
        (**self).outgoing_edges(id, kind).await
    }
}

/// A concept removed from the store, together with the edges that went with it
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedConcept {
    pub concept: Concept,
    pub removed_edges: Vec<Edge>,
}

/// Mutating side of the store.
///
/// Callers outside this crate should not write through a `GraphStore`
/// directly; wrap it in [`crate::hook::InvalidatingStore`] so cached reads
/// are invalidated.
#[async_trait]
pub trait GraphStore: GraphAccessor {
    /// Insert a new concept; `ConceptExists` if the id is taken
    async fn create_concept(&self, concept: Concept) -> Result<Concept>;

    /// Apply a patch and return the updated concept
    async fn update_concept(&self, id: &str, patch: ConceptPatch) -> Result<Concept>;

    /// Remove a concept and every edge that touches it
    async fn delete_concept(&self, id: &str) -> Result<DeletedConcept>;

    /// Insert an edge; both endpoints must exist and the triple must be new
    async fn create_edge(&self, edge: Edge) -> Result<Edge>;

    /// Remove the edge identified by `(source, target, kind)`
    async fn delete_edge(&self, source: &str, target: &str, kind: RelationKind) -> Result<Edge>;

    /// All concepts, sorted by id
    async fn list_concepts(&self) -> Result<Vec<Concept>>;

    /// All edges, in insertion order
    async fn list_edges(&self) -> Result<Vec<Edge>>;

    /// Store-side changeset marker, bumped on every committed write
    async fn changeset(&self) -> u64;
}
