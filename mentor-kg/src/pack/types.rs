//! Context pack types

use crate::cache::types::CacheKey;
use crate::graph::types::{Concept, ConceptId, MasteryLevel, RelationKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One concept in a context pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackItem {
    pub concept_id: ConceptId,
    pub title: String,
    /// L0 summary of the concept
    pub summary: String,
    /// Hops from the root; the root is 0
    pub depth: usize,
    /// Relation that led here; `None` for the root
    pub relation: Option<RelationKind>,
    /// Concept this item was reached from; `None` for the root
    pub parent: Option<ConceptId>,
    pub mastery: MasteryLevel,
}

impl PackItem {
    /// Item for the root of a pack
    pub fn root(concept: &Concept) -> Self {
        Self::build(concept, 0, None, None)
    }

    /// Item reached from `parent` via `relation`
    pub fn reached(concept: &Concept, depth: usize, relation: RelationKind, parent: &str) -> Self {
        Self::build(concept, depth, Some(relation), Some(parent.to_string()))
    }

    fn build(
        concept: &Concept,
        depth: usize,
        relation: Option<RelationKind>,
        parent: Option<ConceptId>,
    ) -> Self {
        Self {
            concept_id: concept.id.clone(),
            title: concept.title.clone(),
            summary: concept.summary.clone(),
            depth,
            relation,
            parent,
            mastery: concept.mastery,
        }
    }
}

/// Bounded, ordered, deduplicated extraction of a concept's prerequisite closure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPack {
    /// Root concept id
    pub root: ConceptId,
    pub items: Vec<PackItem>,
    pub item_count: usize,
    /// True iff some reachable concept did not fit in the budget
    pub truncated: bool,
    pub generated_at: DateTime<Utc>,
    /// Key the pack was cached under
    pub cache_key: CacheKey,
    /// Graph version the pack was computed against
    pub graph_version: u64,
}

impl ContextPack {
    /// Assemble a pack value from traversal output
    pub fn new(
        root: impl Into<String>,
        items: Vec<PackItem>,
        truncated: bool,
        cache_key: CacheKey,
        graph_version: u64,
    ) -> Self {
        Self {
            root: root.into(),
            item_count: items.len(),
            items,
            truncated,
            generated_at: Utc::now(),
            cache_key,
            graph_version,
        }
    }

    /// Concept ids in pack order
    pub fn concept_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.concept_id.as_str()).collect()
    }

    /// Plain outline for prompt embedding, indented by depth
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            let indent = "  ".repeat(item.depth);
            let tag = match item.relation {
                Some(RelationKind::Example) => " (example)",
                _ => "",
            };
            let _ = write!(out, "{}- **{}**{}", indent, item.title, tag);
            if !item.summary.is_empty() {
                let _ = write!(out, ": {}", item.summary);
            }
            let _ = writeln!(out, " [mastery {}]", item.mastery.as_u8());
        }
        if self.truncated {
            out.push_str("- ...\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack() -> ContextPack {
        let kv = Concept::new("kv-cache", "KV Cache", "Reuse keys and values");
        let attn = Concept::new("attention", "Attention", "").with_mastery(MasteryLevel::Mastered);
        let items = vec![
            PackItem::root(&kv),
            PackItem::reached(&attn, 1, RelationKind::Prerequisite, "kv-cache"),
        ];
        ContextPack::new("kv-cache", items, true, "context_pack:kv-cache?budget=2&v=0".into(), 0)
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(pack()).unwrap();

        assert_eq!(json["root"], "kv-cache");
        assert_eq!(json["itemCount"], 2);
        assert_eq!(json["truncated"], true);
        assert!(json["generatedAt"].is_string());

        let root = &json["items"][0];
        assert_eq!(root["conceptId"], "kv-cache");
        assert_eq!(root["depth"], 0);
        assert!(root["relation"].is_null());

        let child = &json["items"][1];
        assert_eq!(child["relation"], "prerequisite");
        assert_eq!(child["parent"], "kv-cache");
        assert_eq!(child["mastery"], 3);
    }

    #[test]
    fn test_render_markdown() {
        let rendered = pack().render_markdown();
        assert_eq!(
            rendered,
            "- **KV Cache**: Reuse keys and values [mastery 0]\n  - **Attention** [mastery 3]\n- ...\n"
        );
    }
}
