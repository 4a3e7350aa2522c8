//! Cascading-impact traversal and report resolution.

use crate::domain::{ItemId, ItemSummary};
use crate::error::Result;
use crate::lookup::ItemLookup;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashSet, VecDeque};

/// All items transitively depending on `start`, excluding `start` itself.
///
/// Breadth-first over incoming edges with duplicate suppression; a visited
/// node is never re-expanded, so the walk is O(V+E) and terminates on any
/// graph. Result is sorted by id, a deterministic representation of the
/// impact set.
pub(super) fn transitive_dependents_impl(
    graph: &DiGraph<ItemId, ()>,
    start: NodeIndex,
) -> Vec<ItemId> {
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    let mut impacted: Vec<ItemId> = Vec::new();
    while let Some(node) = queue.pop_front() {
        for dependent in graph.neighbors_directed(node, Direction::Incoming) {
            if visited.insert(dependent) {
                impacted.push(graph[dependent].clone());
                queue.push_back(dependent);
            }
        }
    }

    impacted.sort();
    impacted
}

/// Resolve a batch of ids to summaries through the lookup boundary.
///
/// Fails with the first `ItemNotFound`; a report with holes would silently
/// understate impact.
pub(super) async fn resolve_summaries(
    lookup: &dyn ItemLookup,
    ids: &[ItemId],
) -> Result<Vec<ItemSummary>> {
    let mut summaries = Vec::with_capacity(ids.len());
    for id in ids {
        summaries.push(lookup.resolve(id).await?);
    }
    Ok(summaries)
}
