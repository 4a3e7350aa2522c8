//! Cycle detection for dependency mutations.
//!
//! Every edge insertion is gated by a reachability check: if the blocker can
//! already reach the dependent through existing edges, the new edge would
//! close a cycle. The check returns the full offending path so callers can
//! show which existing dependencies conflict with the request.
//!
//! All traversal here is iterative (explicit stack) so deep chains cannot
//! overflow the call stack.

use crate::domain::ItemId;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Check whether adding `dependent -> blocker` would close a cycle.
///
/// Returns the cycle the edge would create, as item ids with the first node
/// repeated at the end (`[blocker, ..., dependent, blocker]`), or `None` if
/// the edge is safe. An endpoint not yet in the graph cannot be on any
/// existing path, so the edge is trivially safe.
///
/// Depth-first reachability from `blocker` to `dependent`, O(V+E).
pub(super) fn would_close_cycle(
    graph: &DiGraph<ItemId, ()>,
    node_map: &HashMap<ItemId, NodeIndex>,
    dependent: &ItemId,
    blocker: &ItemId,
) -> Option<Vec<ItemId>> {
    let from = *node_map.get(blocker)?;
    let to = *node_map.get(dependent)?;

    let path = path_between(graph, from, to)?;
    let mut ids: Vec<ItemId> = path.into_iter().map(|n| graph[n].clone()).collect();
    // The requested edge closes the loop back to the blocker.
    ids.push(blocker.clone());
    Some(ids)
}

/// Reconstruct an existing cycle through `node`.
///
/// Used by the defensive checks in path queries: the graph invariant makes a
/// cycle unreachable, but if one is ever observed this recovers its path for
/// diagnostics instead of looping. Returns `None` if no cycle passes through
/// `node`.
pub(super) fn cycle_through(graph: &DiGraph<ItemId, ()>, node: NodeIndex) -> Option<Vec<ItemId>> {
    for succ in graph.neighbors(node) {
        if let Some(path) = path_between(graph, succ, node) {
            let mut ids = vec![graph[node].clone()];
            ids.extend(path.into_iter().map(|n| graph[n].clone()));
            return Some(ids);
        }
    }
    None
}

/// Iterative DFS returning one path `from -> ... -> to`, if any.
fn path_between(
    graph: &DiGraph<ItemId, ()>,
    from: NodeIndex,
    to: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    if from == to {
        return Some(vec![from]);
    }

    let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut stack = vec![from];
    visited.insert(from);

    while let Some(node) = stack.pop() {
        for succ in graph.neighbors(node) {
            if !visited.insert(succ) {
                continue;
            }
            parents.insert(succ, node);
            if succ == to {
                let mut path = vec![to];
                let mut current = to;
                while let Some(&parent) = parents.get(&current) {
                    path.push(parent);
                    current = parent;
                }
                path.reverse();
                return Some(path);
            }
            stack.push(succ);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    struct TestGraph {
        graph: DiGraph<ItemId, ()>,
        node_map: HashMap<ItemId, NodeIndex>,
    }

    impl TestGraph {
        fn with_edges(edges: &[(&str, &str)]) -> Self {
            let mut graph = DiGraph::new();
            let mut node_map = HashMap::new();
            for &(from, to) in edges {
                let from = id(from);
                let to = id(to);
                let f = *node_map
                    .entry(from.clone())
                    .or_insert_with(|| graph.add_node(from.clone()));
                let t = *node_map
                    .entry(to.clone())
                    .or_insert_with(|| graph.add_node(to.clone()));
                graph.add_edge(f, t, ());
            }
            Self { graph, node_map }
        }
    }

    #[test]
    fn closing_edge_reports_full_cycle() {
        let g = TestGraph::with_edges(&[("A", "B"), ("B", "C")]);

        let path = would_close_cycle(&g.graph, &g.node_map, &id("C"), &id("A")).unwrap();
        assert_eq!(path, vec![id("A"), id("B"), id("C"), id("A")]);
    }

    #[test]
    fn direct_back_edge_reports_two_node_cycle() {
        let g = TestGraph::with_edges(&[("A", "B")]);

        let path = would_close_cycle(&g.graph, &g.node_map, &id("B"), &id("A")).unwrap();
        assert_eq!(path, vec![id("A"), id("B"), id("A")]);
    }

    #[test]
    fn unrelated_edge_is_safe() {
        let g = TestGraph::with_edges(&[("A", "B"), ("C", "D")]);

        assert!(would_close_cycle(&g.graph, &g.node_map, &id("A"), &id("C")).is_none());
        assert!(would_close_cycle(&g.graph, &g.node_map, &id("D"), &id("B")).is_none());
    }

    #[test]
    fn new_endpoint_is_always_safe() {
        let g = TestGraph::with_edges(&[("A", "B")]);

        assert!(would_close_cycle(&g.graph, &g.node_map, &id("X"), &id("A")).is_none());
        assert!(would_close_cycle(&g.graph, &g.node_map, &id("B"), &id("Y")).is_none());
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        // 10k-node chain exercises the iterative traversal.
        let edges: Vec<(String, String)> = (0..10_000)
            .map(|i| (format!("N{i:05}"), format!("N{:05}", i + 1)))
            .collect();
        let borrowed: Vec<(&str, &str)> = edges
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        let g = TestGraph::with_edges(&borrowed);

        let path =
            would_close_cycle(&g.graph, &g.node_map, &id("N10000"), &id("N00000")).unwrap();
        assert_eq!(path.len(), 10_002);
        assert_eq!(path.first(), Some(&id("N00000")));
        assert_eq!(path.last(), Some(&id("N00000")));
    }

    #[test]
    fn cycle_through_recovers_existing_cycle() {
        // Manually construct a cyclic graph; the engine never produces one.
        let g = TestGraph::with_edges(&[("A", "B"), ("B", "C"), ("C", "A")]);

        let node = g.node_map[&id("A")];
        let path = cycle_through(&g.graph, node).unwrap();
        assert_eq!(path.first(), Some(&id("A")));
        assert_eq!(path.last(), Some(&id("A")));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn cycle_through_acyclic_graph_is_none() {
        let g = TestGraph::with_edges(&[("A", "B"), ("B", "C")]);

        for node in g.graph.node_indices() {
            assert!(cycle_through(&g.graph, node).is_none());
        }
    }
}
