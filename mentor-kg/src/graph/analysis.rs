//! Prerequisite-graph analysis: study order and cycle reports

use crate::error::{KgError, Result};
use crate::graph::accessor::GraphAccessor;
use crate::graph::types::{Concept, ConceptId, Edge, RelationKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Prerequisite closure of `root_id`, foundations first and `root_id` last.
///
/// Missing concepts are pruned and cycles are cut where the walk first
/// meets an already-visited concept, the same policy the context-pack
/// assembler uses.
pub async fn study_order<A>(graph: &A, root_id: &str) -> Result<Vec<Concept>>
where
    A: GraphAccessor + ?Sized,
{
    let root = graph
        .get_concept(root_id)
        .await
        .map_err(|_| KgError::ConceptNotFound(root_id.to_string()))?;

    let mut dag: DiGraph<Concept, ()> = DiGraph::new();
    let mut indices: HashMap<ConceptId, NodeIndex> = HashMap::new();

    let root_idx = dag.add_node(root);
    indices.insert(root_id.to_string(), root_idx);

    let mut queue = VecDeque::from([root_idx]);
    while let Some(idx) = queue.pop_front() {
        let id = dag[idx].id.clone();
        let edges = match graph.outgoing_edges(&id, RelationKind::Prerequisite).await {
            Ok(edges) => edges,
            Err(e) => {
                debug!("Skipping prerequisites of {}: {}", id, e);
                continue;
            }
        };

        for edge in edges {
            let target_idx = match indices.get(&edge.target) {
                Some(&existing) => existing,
                None => match graph.get_concept(&edge.target).await {
                    Ok(concept) => {
                        let added = dag.add_node(concept);
                        indices.insert(edge.target.clone(), added);
                        queue.push_back(added);
                        added
                    }
                    Err(e) => {
                        debug!("Pruning {}: {}", edge.describe(), e);
                        continue;
                    }
                },
            };
            // DfsPostOrder explores the earliest-added edge first, matching store order
            dag.add_edge(idx, target_idx, ());
        }
    }

    let mut order = Vec::with_capacity(dag.node_count());
    let mut dfs = DfsPostOrder::new(&dag, root_idx);
    while let Some(idx) = dfs.next(&dag) {
        order.push(dag[idx].clone());
    }

    Ok(order)
}

/// Every prerequisite cycle in `edges`, as sorted id lists in sorted order.
///
/// Self-loops count as cycles of one.
pub fn prerequisite_cycles(edges: &[Edge]) -> Vec<Vec<ConceptId>> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

    for edge in edges.iter().filter(|e| e.kind == RelationKind::Prerequisite) {
        let source = index_of(&mut graph, &mut indices, &edge.source);
        let target = index_of(&mut graph, &mut indices, &edge.target);
        graph.add_edge(source, target, ());
    }

    let mut cycles: Vec<Vec<ConceptId>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut ids: Vec<ConceptId> = scc.iter().map(|idx| graph[*idx].to_string()).collect();
            ids.sort();
            ids
        })
        .collect();

    cycles.sort();
    cycles
}

fn index_of<'a>(
    graph: &mut DiGraph<&'a str, ()>,
    indices: &mut HashMap<&'a str, NodeIndex>,
    id: &'a str,
) -> NodeIndex {
    *indices.entry(id).or_insert_with(|| graph.add_node(id))
}
