//! Blocker ranking and ready-item queries.
//!
//! Both queries read only node degrees, so they stay O(V+E) regardless of
//! how tangled the graph is.

use crate::domain::{BlockingItem, ItemId};
use petgraph::Direction;
use petgraph::graph::DiGraph;

/// Rank items by how many other items they directly block.
///
/// Only items with at least one dependent appear. Ordered by dependent
/// count descending, ties by id ascending.
pub(super) fn find_blocking_items_impl(graph: &DiGraph<ItemId, ()>) -> Vec<BlockingItem> {
    let mut rows: Vec<BlockingItem> = graph
        .node_indices()
        .filter_map(|node| {
            let count = graph
                .neighbors_directed(node, Direction::Incoming)
                .count();
            (count > 0).then(|| BlockingItem {
                id: graph[node].clone(),
                dependent_count: count,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.dependent_count
            .cmp(&a.dependent_count)
            .then_with(|| a.id.cmp(&b.id))
    });
    rows
}

/// Items with zero outstanding blockers, sorted by id.
///
/// Covers only items participating in the graph; items with no dependency
/// edges at all are trivially unblocked but unknown to the engine.
pub(super) fn find_ready_items_impl(graph: &DiGraph<ItemId, ()>) -> Vec<ItemId> {
    let mut ready: Vec<ItemId> = graph
        .node_indices()
        .filter(|&node| {
            graph
                .neighbors_directed(node, Direction::Outgoing)
                .next()
                .is_none()
        })
        .map(|node| graph[node].clone())
        .collect();
    ready.sort();
    ready
}
