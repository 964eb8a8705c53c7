//! Write-invalidation hook
//!
//! Every concept/edge mutation goes through [`InvalidatingStore`]. After the
//! store applies a write successfully the hook bumps [`GraphVersion`] and then
//! clears the whole cache, in that order, before the caller sees success.
//! Cache keys embed the version, so a pack computed concurrently with a
//! write lands under a superseded key and is never served afterwards.

use crate::cache::invalidation::InvalidationReason;
use crate::cache::store::QueryCache;
use crate::error::Result;
use crate::graph::accessor::{DeletedConcept, GraphAccessor, GraphStore};
use crate::graph::types::{Concept, ConceptPatch, Edge, RelationKind};
use crate::pack::types::ContextPack;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Monotonic counter bumped on every successful write
#[derive(Debug, Default)]
pub struct GraphVersion(AtomicU64);

impl GraphVersion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `version`
    pub fn starting_at(version: u64) -> Self {
        Self(AtomicU64::new(version))
    }

    /// Current version
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Increment and return the new version
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// What a successful write did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    /// Graph version after the write
    pub version: u64,
    /// Cache entries dropped by the write
    pub invalidated: usize,
}

/// Store result plus the receipt of the invalidation that followed it
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    pub record: T,
    pub receipt: WriteReceipt,
}

impl<T> Committed<T> {
    pub fn into_record(self) -> T {
        self.record
    }
}

/// Store wrapper that invalidates the cache on every mutation.
///
/// Reads pass straight through to the inner store.
pub struct InvalidatingStore<S, V = ContextPack> {
    store: Arc<S>,
    cache: Arc<QueryCache<V>>,
    version: Arc<GraphVersion>,
}

impl<S, V> Clone for InvalidatingStore<S, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            version: Arc::clone(&self.version),
        }
    }
}

impl<S, V> InvalidatingStore<S, V>
where
    S: GraphStore,
    V: Clone + Send + Sync,
{
    pub fn new(store: Arc<S>, cache: Arc<QueryCache<V>>, version: Arc<GraphVersion>) -> Self {
        Self {
            store,
            cache,
            version,
        }
    }

    /// The wrapped store; writes made through it directly skip invalidation
    pub fn inner(&self) -> &Arc<S> {
        &self.store
    }

    pub fn version(&self) -> &Arc<GraphVersion> {
        &self.version
    }

    pub fn cache(&self) -> &Arc<QueryCache<V>> {
        &self.cache
    }

    pub async fn create_concept(&self, concept: Concept) -> Result<Committed<Concept>> {
        let result = self.store.create_concept(concept).await;
        self.commit("create_concept", result).await
    }

    pub async fn update_concept(&self, id: &str, patch: ConceptPatch) -> Result<Committed<Concept>> {
        let result = self.store.update_concept(id, patch).await;
        self.commit("update_concept", result).await
    }

    pub async fn delete_concept(&self, id: &str) -> Result<Committed<DeletedConcept>> {
        let result = self.store.delete_concept(id).await;
        self.commit("delete_concept", result).await
    }

    pub async fn create_edge(&self, edge: Edge) -> Result<Committed<Edge>> {
        let result = self.store.create_edge(edge).await;
        self.commit("create_edge", result).await
    }

    pub async fn delete_edge(
        &self,
        source: &str,
        target: &str,
        kind: RelationKind,
    ) -> Result<Committed<Edge>> {
        let result = self.store.delete_edge(source, target, kind).await;
        self.commit("delete_edge", result).await
    }

    async fn commit<T>(&self, operation: &str, result: Result<T>) -> Result<Committed<T>> {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!("{} failed, cache left intact: {}", operation, e);
                return Err(e);
            }
        };

        let version = self.version.bump();
        let event = self
            .cache
            .invalidate_all()
            .await
            .with_reason(InvalidationReason::GraphWrite {
                operation: operation.to_string(),
                version,
            });

        info!(
            "{} committed; {} ({} entries cleared)",
            operation, event.reason, event.cleared
        );

        Ok(Committed {
            record,
            receipt: WriteReceipt {
                version,
                invalidated: event.cleared,
            },
        })
    }
}

#[async_trait]
impl<S, V> GraphAccessor for InvalidatingStore<S, V>
where
    S: GraphStore,
    V: Send + Sync,
{
    async fn get_concept(&self, id: &str) -> Result<Concept> {
        self.store.get_concept(id).await
    }

    async fn outgoing_edges(&self, id: &str, kind: RelationKind) -> Result<Vec<Edge>> {
        self.store.outgoing_edges(id, kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KgError;
    use crate::graph::memory::MemoryGraphStore;
    use std::time::Duration;

    fn hooked() -> InvalidatingStore<MemoryGraphStore, String> {
        InvalidatingStore::new(
            Arc::new(MemoryGraphStore::new()),
            Arc::new(QueryCache::with_ttl(Duration::from_secs(30))),
            Arc::new(GraphVersion::new()),
        )
    }

    #[test]
    fn test_graph_version_bump() {
        let version = GraphVersion::starting_at(41);
        assert_eq!(version.current(), 41);
        assert_eq!(version.bump(), 42);
        assert_eq!(version.current(), 42);
    }

    #[tokio::test]
    async fn test_write_bumps_version_and_clears_cache() {
        let hook = hooked();
        hook.cache().insert("a", "pack-a".to_string()).await;
        hook.cache().insert("b", "pack-b".to_string()).await;

        let committed = hook
            .create_concept(Concept::new("attention", "Attention", ""))
            .await
            .unwrap();

        assert_eq!(committed.record.id, "attention");
        assert_eq!(
            committed.receipt,
            WriteReceipt {
                version: 1,
                invalidated: 2
            }
        );
        assert!(hook.cache().is_empty().await);
        assert_eq!(hook.version().current(), 1);
    }

    #[tokio::test]
    async fn test_every_write_kind_invalidates() {
        let hook = hooked();
        hook.create_concept(Concept::new("a", "A", "")).await.unwrap();
        hook.create_concept(Concept::new("b", "B", "")).await.unwrap();

        hook.cache().insert("k", "v".to_string()).await;
        hook.create_edge(Edge::prerequisite("a", "b")).await.unwrap();
        assert!(hook.cache().is_empty().await);

        hook.cache().insert("k", "v".to_string()).await;
        hook.update_concept("a", ConceptPatch {
            summary: Some("first".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(hook.cache().is_empty().await);

        hook.cache().insert("k", "v".to_string()).await;
        hook.delete_edge("a", "b", RelationKind::Prerequisite)
            .await
            .unwrap();
        assert!(hook.cache().is_empty().await);

        hook.cache().insert("k", "v".to_string()).await;
        let deleted = hook.delete_concept("b").await.unwrap();
        assert_eq!(deleted.receipt.invalidated, 1);
        assert!(hook.cache().is_empty().await);

        assert_eq!(hook.version().current(), 6);
        assert_eq!(hook.cache().stats().await.clears, 6);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_and_version() {
        let hook = hooked();
        hook.cache().insert("k", "v".to_string()).await;

        let result = hook.create_edge(Edge::prerequisite("ghost", "phantom")).await;
        assert!(matches!(result, Err(KgError::NotFound { .. })));

        assert_eq!(hook.version().current(), 0);
        assert_eq!(hook.cache().get("k").await, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_reads_delegate_to_store() {
        let hook = hooked();
        hook.create_concept(Concept::new("a", "A", "")).await.unwrap();

        assert_eq!(hook.get_concept("a").await.unwrap().title, "A");
        assert!(hook
            .outgoing_edges("a", RelationKind::Example)
            .await
            .unwrap()
            .is_empty());
    }
}
