//! Longest-path computation over the dependency DAG.
//!
//! The graph is unweighted: one hop per edge. The critical path is the
//! longest directed chain in the `dependent -> blocker` orientation, found
//! by dynamic programming over a topological order. Ties are broken by
//! lexicographic item id - first when relaxing (the smaller predecessor id
//! wins among equal-length paths into a node), then when picking the
//! terminal node - so results do not depend on edge insertion order.
//!
//! A cycle should be impossible here (every mutation is gated by the cycle
//! detector), but the toposort refuses to loop on a corrupted graph and
//! reports the cycle instead.

use super::cycle::cycle_through;
use crate::domain::ItemId;
use crate::error::{Error, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

/// Find one longest dependency chain in the graph.
///
/// Returns item ids in edge order: the deepest dependent first, the terminal
/// blocker last. Empty graph yields an empty vec.
pub(super) fn find_critical_path_impl(graph: &DiGraph<ItemId, ()>) -> Result<Vec<ItemId>> {
    if graph.node_count() == 0 {
        return Ok(Vec::new());
    }

    let order = sorted_or_cycle(graph)?;

    // dist[v] = edge count of the longest path ending at v; pred[v] is the
    // node that path arrives from. Node indices are compact (isolated nodes
    // are pruned on removal), so plain vectors suffice.
    let mut dist = vec![0_usize; graph.node_count()];
    let mut pred: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];

    for &u in &order {
        let candidate = dist[u.index()] + 1;
        for v in graph.neighbors(u) {
            if candidate > dist[v.index()] {
                dist[v.index()] = candidate;
                pred[v.index()] = Some(u);
            } else if candidate == dist[v.index()] {
                // Equal-length path into v: keep the smaller predecessor id.
                let keep = pred[v.index()].is_none_or(|p| graph[u] < graph[p]);
                if keep {
                    pred[v.index()] = Some(u);
                }
            }
        }
    }

    // Terminal: maximum distance, ties by smallest id.
    let mut terminal: Option<NodeIndex> = None;
    for node in graph.node_indices() {
        let better = match terminal {
            None => true,
            Some(t) => {
                dist[node.index()] > dist[t.index()]
                    || (dist[node.index()] == dist[t.index()] && graph[node] < graph[t])
            }
        };
        if better {
            terminal = Some(node);
        }
    }

    let Some(terminal) = terminal else {
        return Ok(Vec::new());
    };

    let mut path = vec![terminal];
    let mut current = terminal;
    while let Some(p) = pred[current.index()] {
        path.push(p);
        current = p;
    }
    path.reverse();

    Ok(path.into_iter().map(|n| graph[n].clone()).collect())
}

/// Longest blocker chain starting at `start`.
///
/// Follows depends-on edges from the item, always descending into the
/// deepest remaining subchain (ties by smallest id). Returns `[start]` when
/// nothing blocks the item.
pub(super) fn longest_chain_from(
    graph: &DiGraph<ItemId, ()>,
    start: NodeIndex,
) -> Result<Vec<ItemId>> {
    let order = sorted_or_cycle(graph)?;

    // depth[u] = edge count of the longest path starting at u. Reverse
    // topological order makes every successor final before its parents.
    let mut depth = vec![0_usize; graph.node_count()];
    for &u in order.iter().rev() {
        for v in graph.neighbors(u) {
            depth[u.index()] = depth[u.index()].max(depth[v.index()] + 1);
        }
    }

    let mut path = vec![graph[start].clone()];
    let mut current = start;
    while depth[current.index()] > 0 {
        let want = depth[current.index()] - 1;
        let mut next: Option<NodeIndex> = None;
        for v in graph.neighbors(current) {
            if depth[v.index()] == want && next.is_none_or(|n| graph[v] < graph[n]) {
                next = Some(v);
            }
        }
        let Some(v) = next else {
            break;
        };
        path.push(graph[v].clone());
        current = v;
    }

    Ok(path)
}

/// Enumerate every maximal source-to-sink chain in the graph.
///
/// Sources are items nothing depends on; sinks are items with no blockers.
/// Paths are returned longest first, equal lengths in lexicographic order.
/// Path count can grow exponentially with graph density; callers use this
/// for human-scale reports, not bulk analysis.
pub(super) fn parallel_paths_impl(graph: &DiGraph<ItemId, ()>) -> Result<Vec<Vec<ItemId>>> {
    if graph.node_count() == 0 {
        return Ok(Vec::new());
    }

    // Termination below relies on acyclicity.
    sorted_or_cycle(graph)?;

    let sources: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&n| {
            graph
                .neighbors_directed(n, petgraph::Direction::Incoming)
                .next()
                .is_none()
        })
        .collect();

    let mut paths: Vec<Vec<ItemId>> = Vec::new();
    for source in sources {
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = vec![(source, vec![source])];
        while let Some((node, path)) = stack.pop() {
            let mut extended = false;
            for succ in graph.neighbors(node) {
                let mut longer = path.clone();
                longer.push(succ);
                stack.push((succ, longer));
                extended = true;
            }
            if !extended {
                paths.push(path.into_iter().map(|n| graph[n].clone()).collect());
            }
        }
    }

    paths.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    Ok(paths)
}

/// Topological order, or a `CycleDetected` error carrying the cycle path.
fn sorted_or_cycle(graph: &DiGraph<ItemId, ()>) -> Result<Vec<NodeIndex>> {
    toposort(graph, None).map_err(|cycle| {
        let node = cycle.node_id();
        let path =
            cycle_through(graph, node).unwrap_or_else(|| vec![graph[node].clone()]);
        Error::CycleDetected { path }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    fn build(edges: &[(&str, &str)]) -> (DiGraph<ItemId, ()>, Vec<NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut map = std::collections::HashMap::new();
        for &(from, to) in edges {
            let f = *map
                .entry(from.to_string())
                .or_insert_with(|| graph.add_node(id(from)));
            let t = *map
                .entry(to.to_string())
                .or_insert_with(|| graph.add_node(id(to)));
            graph.add_edge(f, t, ());
        }
        let nodes = graph.node_indices().collect();
        (graph, nodes)
    }

    #[test]
    fn chain_is_its_own_critical_path() {
        let (graph, _) = build(&[("A", "B"), ("B", "C")]);
        let path = find_critical_path_impl(&graph).unwrap();
        assert_eq!(path, vec![id("A"), id("B"), id("C")]);
    }

    #[test]
    fn empty_graph_has_empty_path() {
        let graph: DiGraph<ItemId, ()> = DiGraph::new();
        assert!(find_critical_path_impl(&graph).unwrap().is_empty());
    }

    #[test]
    fn longest_branch_wins() {
        // A -> B -> C -> D (3 edges) beats A -> E (1 edge).
        let (graph, _) = build(&[("A", "B"), ("B", "C"), ("C", "D"), ("A", "E")]);
        let path = find_critical_path_impl(&graph).unwrap();
        assert_eq!(path, vec![id("A"), id("B"), id("C"), id("D")]);
    }

    #[test]
    fn terminal_tie_prefers_smallest_id() {
        // Two length-1 chains; the one ending at the smaller id wins.
        let (graph, _) = build(&[("X", "M"), ("Y", "K")]);
        let path = find_critical_path_impl(&graph).unwrap();
        assert_eq!(path, vec![id("Y"), id("K")]);
    }

    #[test]
    fn relaxation_tie_prefers_smallest_predecessor() {
        // Both B and C reach D with equal-length paths from sources B, C.
        let (graph, _) = build(&[("C", "D"), ("B", "D")]);
        let path = find_critical_path_impl(&graph).unwrap();
        assert_eq!(path, vec![id("B"), id("D")]);
    }

    #[test]
    fn insertion_order_does_not_change_result() {
        let (g1, _) = build(&[("A", "B"), ("B", "C"), ("X", "C"), ("A", "C")]);
        let (g2, _) = build(&[("A", "C"), ("X", "C"), ("B", "C"), ("A", "B")]);
        assert_eq!(
            find_critical_path_impl(&g1).unwrap(),
            find_critical_path_impl(&g2).unwrap()
        );
    }

    #[test]
    fn cyclic_graph_is_rejected_not_looped() {
        let (graph, _) = build(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let err = find_critical_path_impl(&graph).unwrap_err();
        match err {
            Error::CycleDetected { path } => {
                assert!(path.len() >= 2);
                assert_eq!(path.first(), path.last());
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn chain_from_item_follows_deepest_branch() {
        // From A: A -> B -> D (depth 2) beats A -> C (depth 1).
        let (graph, _) = build(&[("A", "B"), ("A", "C"), ("B", "D")]);
        let start = graph
            .node_indices()
            .find(|&n| graph[n] == id("A"))
            .unwrap();
        let path = longest_chain_from(&graph, start).unwrap();
        assert_eq!(path, vec![id("A"), id("B"), id("D")]);
    }

    #[test]
    fn chain_from_unblocked_item_is_just_the_item() {
        let (graph, _) = build(&[("A", "B")]);
        let b = graph
            .node_indices()
            .find(|&n| graph[n] == id("B"))
            .unwrap();
        assert_eq!(longest_chain_from(&graph, b).unwrap(), vec![id("B")]);
    }

    #[test]
    fn parallel_paths_are_ranked_longest_first() {
        // Diamond plus a short spur: A->B->D, A->C->D, E->D.
        let (graph, _) = build(&[("A", "B"), ("B", "D"), ("A", "C"), ("C", "D"), ("E", "D")]);
        let paths = parallel_paths_impl(&graph).unwrap();
        assert_eq!(
            paths,
            vec![
                vec![id("A"), id("B"), id("D")],
                vec![id("A"), id("C"), id("D")],
                vec![id("E"), id("D")],
            ]
        );
    }

    #[test]
    fn deep_chain_paths_do_not_overflow() {
        let edges: Vec<(String, String)> = (0..5_000)
            .map(|i| (format!("N{i:04}"), format!("N{:04}", i + 1)))
            .collect();
        let borrowed: Vec<(&str, &str)> = edges
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        let (graph, _) = build(&borrowed);

        let path = find_critical_path_impl(&graph).unwrap();
        assert_eq!(path.len(), 5_001);
    }
}
