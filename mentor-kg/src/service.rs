//! Facade wiring store, cache, hook and assembler together

use crate::cache::store::QueryCache;
use crate::cache::types::CacheStats;
use crate::config::MentorConfig;
use crate::error::Result;
use crate::graph::accessor::GraphStore;
use crate::graph::analysis;
use crate::graph::types::{Concept, ConceptId};
use crate::hook::{GraphVersion, InvalidatingStore};
use crate::pack::assembler::ContextPackAssembler;
use crate::pack::types::ContextPack;
use std::sync::Arc;
use tracing::info;

/// One tutor instance over a graph store.
///
/// All writes go through [`Mentor::writer`], so every mutation clears the
/// pack cache before it is acknowledged.
pub struct Mentor<S> {
    config: MentorConfig,
    writer: InvalidatingStore<S>,
    assembler: ContextPackAssembler<InvalidatingStore<S>>,
}

impl<S: GraphStore + 'static> Mentor<S> {
    /// Fails with `ConfigError` if `config` does not validate
    pub fn new(store: S, config: MentorConfig) -> Result<Self> {
        Self::with_shared_store(Arc::new(store), config)
    }

    pub fn with_shared_store(store: Arc<S>, config: MentorConfig) -> Result<Self> {
        config.validate()?;

        let cache = Arc::new(QueryCache::try_new(config.cache.clone())?);
        let version = Arc::new(GraphVersion::new());
        let writer = InvalidatingStore::new(store, Arc::clone(&cache), Arc::clone(&version));
        let assembler = ContextPackAssembler::new(Arc::new(writer.clone()), cache, version)
            .with_max_budget(config.max_budget);

        info!(
            "Mentor ready (ttl {:?}, budget {}/{})",
            config.cache.default_ttl, config.default_budget, config.max_budget
        );

        Ok(Self {
            config,
            writer,
            assembler,
        })
    }

    /// Write path; every successful call bumps the graph version
    pub fn writer(&self) -> &InvalidatingStore<S> {
        &self.writer
    }

    /// Underlying store, for reads
    pub fn store(&self) -> &Arc<S> {
        self.writer.inner()
    }

    pub fn config(&self) -> &MentorConfig {
        &self.config
    }

    /// Context pack for `root_id`; `None` uses the configured default budget
    pub async fn context_pack(&self, root_id: &str, budget: Option<usize>) -> Result<ContextPack> {
        let budget = budget.unwrap_or(self.config.default_budget);
        self.assembler.assemble(root_id, budget).await
    }

    /// Prerequisites of `root_id`, foundations first
    pub async fn study_order(&self, root_id: &str) -> Result<Vec<Concept>> {
        analysis::study_order(self.store().as_ref(), root_id).await
    }

    /// Prerequisite cycles currently in the store
    pub async fn cycles(&self) -> Result<Vec<Vec<ConceptId>>> {
        let edges = self.store().list_edges().await?;
        Ok(analysis::prerequisite_cycles(&edges))
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.writer.cache().stats().await
    }

    pub fn graph_version(&self) -> u64 {
        self.writer.version().current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KgError;
    use crate::graph::memory::MemoryGraphStore;
    use crate::graph::types::{ConceptPatch, Edge};

    async fn mentor() -> Mentor<MemoryGraphStore> {
        let mentor = Mentor::new(MemoryGraphStore::new(), MentorConfig::default()).unwrap();
        let writer = mentor.writer();
        for (id, title) in [("kv-cache", "KV Cache"), ("attention", "Attention")] {
            writer.create_concept(Concept::new(id, title, "")).await.unwrap();
        }
        writer
            .create_edge(Edge::prerequisite("kv-cache", "attention"))
            .await
            .unwrap();
        mentor
    }

    #[tokio::test]
    async fn test_default_budget_applies() {
        let mentor = mentor().await;
        let pack = mentor.context_pack("kv-cache", None).await.unwrap();
        assert!(pack.cache_key.contains("budget=25"));
        assert_eq!(pack.graph_version, 3);
    }

    #[tokio::test]
    async fn test_write_after_read_is_visible() {
        let mentor = mentor().await;
        let before = mentor.context_pack("kv-cache", Some(5)).await.unwrap();
        assert_eq!(before.items[1].title, "Attention");

        mentor
            .writer()
            .update_concept(
                "attention",
                ConceptPatch {
                    title: Some("Self-Attention".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let after = mentor.context_pack("kv-cache", Some(5)).await.unwrap();
        assert_eq!(after.items[1].title, "Self-Attention");
        assert_eq!(after.graph_version, before.graph_version + 1);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = MentorConfig {
            max_budget: 0,
            ..Default::default()
        };
        assert!(matches!(
            Mentor::new(MemoryGraphStore::new(), config),
            Err(KgError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_cycles_and_study_order() {
        let mentor = mentor().await;
        mentor
            .writer()
            .create_edge(Edge::prerequisite("attention", "kv-cache"))
            .await
            .unwrap();

        let cycles = mentor.cycles().await.unwrap();
        assert_eq!(cycles, vec![vec!["attention".to_string(), "kv-cache".to_string()]]);

        let order = mentor.study_order("kv-cache").await.unwrap();
        assert_eq!(order.len(), 2);
        assert_eq!(order[1].id, "kv-cache");
    }
}
