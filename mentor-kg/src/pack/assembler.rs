//! Context-pack assembler
//!
//! Breadth-first walk over prerequisite edges from the root. Example edges
//! of each expanded node become leaf items placed right after their parent.
//! Every concept appears at most once. A concept first emitted as an example
//! is still expanded when a prerequisite edge later reaches it, so the
//! prerequisite closure is never cut short by an example leaf.
//! The walk stops when the pack holds `budget` items.

use crate::cache::keys::CacheKeyBuilder;
use crate::cache::store::QueryCache;
use crate::error::{KgError, Result};
use crate::graph::accessor::GraphAccessor;
use crate::graph::types::{Concept, ConceptId, Edge, RelationKind};
use crate::hook::GraphVersion;
use crate::pack::types::{ContextPack, PackItem};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Largest budget accepted unless configured otherwise
pub const DEFAULT_MAX_BUDGET: usize = 500;

/// Concept waiting in the traversal queue
struct Pending {
    id: ConceptId,
    depth: usize,
    parent: ConceptId,
}

/// Traversal state for one pack
struct Walk {
    items: Vec<PackItem>,
    /// Concepts already in `items`
    emitted: HashSet<ConceptId>,
    /// Root plus every concept discovered through a prerequisite edge
    queued: HashSet<ConceptId>,
    queue: VecDeque<Pending>,
    budget: usize,
    truncated: bool,
}

impl Walk {
    fn new(root_id: &str, budget: usize) -> Self {
        Self {
            items: Vec::with_capacity(budget.min(64)),
            emitted: HashSet::new(),
            queued: HashSet::from([root_id.to_string()]),
            queue: VecDeque::new(),
            budget,
            truncated: false,
        }
    }

    /// True, and marks the pack truncated, when no further item fits
    fn full(&mut self) -> bool {
        if self.items.len() >= self.budget {
            self.truncated = true;
        }
        self.truncated
    }

    fn emit(&mut self, item: PackItem) {
        self.emitted.insert(item.concept_id.clone());
        self.items.push(item);
    }
}

/// Builds context packs and caches them under `(root, budget, version)`
pub struct ContextPackAssembler<A> {
    graph: Arc<A>,
    cache: Arc<QueryCache<ContextPack>>,
    version: Arc<GraphVersion>,
    ttl: Duration,
    max_budget: usize,
}

impl<A: GraphAccessor> ContextPackAssembler<A> {
    /// Packs are stored with the cache's default TTL
    pub fn new(
        graph: Arc<A>,
        cache: Arc<QueryCache<ContextPack>>,
        version: Arc<GraphVersion>,
    ) -> Self {
        let ttl = cache.config().default_ttl;
        Self {
            graph,
            cache,
            version,
            ttl,
            max_budget: DEFAULT_MAX_BUDGET,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_budget(mut self, max_budget: usize) -> Self {
        self.max_budget = max_budget;
        self
    }

    pub fn max_budget(&self) -> usize {
        self.max_budget
    }

    /// Context pack for `root_id` with at most `budget` items.
    ///
    /// Fails with `InvalidBudget` for a zero or oversized budget and with
    /// `ConceptNotFound` when the root is missing. Missing non-root concepts
    /// are pruned.
    pub async fn assemble(&self, root_id: &str, budget: usize) -> Result<ContextPack> {
        if budget == 0 || budget > self.max_budget {
            return Err(KgError::InvalidBudget(budget));
        }

        let version = self.version.current();
        let key = CacheKeyBuilder::context_pack(root_id, budget, version);

        if let Some(pack) = self.cache.get(&key).await {
            debug!("Serving cached pack {}", key);
            return Ok(pack);
        }

        let root = self
            .graph
            .get_concept(root_id)
            .await
            .map_err(|_| KgError::ConceptNotFound(root_id.to_string()))?;

        let mut walk = Walk::new(root_id, budget);
        walk.emit(PackItem::root(&root));
        self.expand(&mut walk, &root, 0).await;

        while !walk.truncated {
            let Some(next) = walk.queue.pop_front() else {
                break;
            };

            let concept = match self.graph.get_concept(&next.id).await {
                Ok(concept) => concept,
                Err(e) => {
                    debug!("Pruning {}: {}", next.id, e);
                    continue;
                }
            };

            // Already present as an example leaf; only its edges are new
            if !walk.emitted.contains(&concept.id) {
                if walk.full() {
                    break;
                }
                walk.emit(PackItem::reached(
                    &concept,
                    next.depth,
                    RelationKind::Prerequisite,
                    &next.parent,
                ));
            }
            self.expand(&mut walk, &concept, next.depth).await;
        }

        let pack = ContextPack::new(root_id, walk.items, walk.truncated, key.clone(), version);
        debug!(
            "Assembled pack {} with {} items (truncated: {})",
            key, pack.item_count, pack.truncated
        );

        self.cache.set(key, pack.clone(), self.ttl).await;
        Ok(pack)
    }

    /// Emit the example leaves of `concept` and queue its undiscovered prerequisites
    async fn expand(&self, walk: &mut Walk, concept: &Concept, depth: usize) {
        for edge in self.edges(&concept.id, RelationKind::Example).await {
            if walk.emitted.contains(&edge.target) || walk.queued.contains(&edge.target) {
                continue;
            }

            let example = match self.graph.get_concept(&edge.target).await {
                Ok(example) => example,
                Err(e) => {
                    debug!("Pruning {}: {}", edge.describe(), e);
                    continue;
                }
            };

            if walk.full() {
                return;
            }

            walk.emit(PackItem::reached(
                &example,
                depth + 1,
                RelationKind::Example,
                &concept.id,
            ));
        }

        for edge in self.edges(&concept.id, RelationKind::Prerequisite).await {
            if walk.queued.insert(edge.target.clone()) {
                walk.queue.push_back(Pending {
                    id: edge.target,
                    depth: depth + 1,
                    parent: concept.id.clone(),
                });
            }
        }
    }

    async fn edges(&self, id: &str, kind: RelationKind) -> Vec<Edge> {
        match self.graph.outgoing_edges(id, kind).await {
            Ok(edges) => edges,
            Err(e) => {
                warn!("Treating {} edges of {} as empty: {}", kind, id, e);
                Vec::new()
            }
        }
    }
}
