//! In-memory concept store
//!
//! Reference implementation of [`GraphStore`] used by the CLI, the HTTP
//! server and tests. Edges are kept in insertion order so traversal order
//! is reproducible.

use crate::error::{KgError, Result};
use crate::graph::accessor::{DeletedConcept, GraphAccessor, GraphStore};
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::types::{Concept, ConceptId, ConceptPatch, Edge, RelationKind};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryGraph {
    concepts: HashMap<ConceptId, Concept>,
    edges: Vec<Edge>,
    changeset: u64,
}

impl MemoryGraph {
    fn require_concept(&self, id: &str) -> Result<()> {
        if self.concepts.contains_key(id) {
            Ok(())
        } else {
            Err(KgError::concept_missing(id))
        }
    }

    fn insert_concept(&mut self, concept: Concept) -> Result<()> {
        concept.validate()?;
        if self.concepts.contains_key(&concept.id) {
            return Err(KgError::ConceptExists(concept.id));
        }
        self.concepts.insert(concept.id.clone(), concept);
        Ok(())
    }

    fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        self.require_concept(&edge.source)?;
        self.require_concept(&edge.target)?;

        if self
            .edges
            .iter()
            .any(|e| e.matches(&edge.source, &edge.target, edge.kind))
        {
            return Err(KgError::EdgeExists {
                from: edge.source,
                to: edge.target,
                kind: edge.kind.to_string(),
            });
        }

        self.edges.push(edge);
        Ok(())
    }
}

/// Thread-safe in-memory graph store
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    inner: RwLock<MemoryGraph>,
}

impl MemoryGraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, validating every record
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let mut graph = MemoryGraph::default();
        for concept in snapshot.concepts {
            graph.insert_concept(concept)?;
        }
        for edge in snapshot.edges {
            graph.insert_edge(edge)?;
        }

        debug!(
            "Loaded snapshot with {} concepts and {} edges",
            graph.concepts.len(),
            graph.edges.len()
        );

        Ok(Self {
            inner: RwLock::new(graph),
        })
    }

    /// Export the current contents, concepts sorted by id
    pub async fn to_snapshot(&self) -> GraphSnapshot {
        let graph = self.inner.read().await;
        let mut concepts: Vec<Concept> = graph.concepts.values().cloned().collect();
        concepts.sort_by(|a, b| a.id.cmp(&b.id));

        GraphSnapshot {
            concepts,
            edges: graph.edges.clone(),
        }
    }
}

#[async_trait]
impl GraphAccessor for MemoryGraphStore {
    async fn get_concept(&self, id: &str) -> Result<Concept> {
        let graph = self.inner.read().await;
        graph
            .concepts
            .get(id)
            .cloned()
            .ok_or_else(|| KgError::concept_missing(id))
    }

    async fn outgoing_edges(&self, id: &str, kind: RelationKind) -> Result<Vec<Edge>> {
        let graph = self.inner.read().await;
        graph.require_concept(id)?;
        Ok(graph
            .edges
            .iter()
            .filter(|e| e.source == id && e.kind == kind)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn create_concept(&self, concept: Concept) -> Result<Concept> {
        let mut graph = self.inner.write().await;
        graph.insert_concept(concept.clone())?;
        graph.changeset += 1;
        Ok(concept)
    }

    async fn update_concept(&self, id: &str, patch: ConceptPatch) -> Result<Concept> {
        let mut graph = self.inner.write().await;
        let concept = graph
            .concepts
            .get_mut(id)
            .ok_or_else(|| KgError::concept_missing(id))?;

        let mut updated = concept.clone();
        patch.apply(&mut updated);
        updated.validate()?;
        *concept = updated.clone();

        graph.changeset += 1;
        Ok(updated)
    }

    async fn delete_concept(&self, id: &str) -> Result<DeletedConcept> {
        let mut graph = self.inner.write().await;
        let concept = graph
            .concepts
            .remove(id)
            .ok_or_else(|| KgError::concept_missing(id))?;

        let (removed_edges, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut graph.edges)
            .into_iter()
            .partition(|e| e.source == id || e.target == id);
        graph.edges = kept;
        graph.changeset += 1;

        debug!(
            "Deleted concept {} and {} incident edges",
            id,
            removed_edges.len()
        );

        Ok(DeletedConcept {
            concept,
            removed_edges,
        })
    }

    async fn create_edge(&self, edge: Edge) -> Result<Edge> {
        let mut graph = self.inner.write().await;
        graph.insert_edge(edge.clone())?;
        graph.changeset += 1;
        Ok(edge)
    }

    async fn delete_edge(&self, source: &str, target: &str, kind: RelationKind) -> Result<Edge> {
        let mut graph = self.inner.write().await;
        let position = graph
            .edges
            .iter()
            .position(|e| e.matches(source, target, kind))
            .ok_or_else(|| {
                KgError::edge_missing(Edge::new(source, target, kind).describe())
            })?;

        let edge = graph.edges.remove(position);
        graph.changeset += 1;
        Ok(edge)
    }

    async fn list_concepts(&self) -> Result<Vec<Concept>> {
        Ok(self.to_snapshot().await.concepts)
    }

    async fn list_edges(&self) -> Result<Vec<Edge>> {
        Ok(self.inner.read().await.edges.clone())
    }

    async fn changeset(&self) -> u64 {
        self.inner.read().await.changeset
    }
}
