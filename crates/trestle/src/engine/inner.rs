//! Core graph data structure.
//!
//! This module contains the inner edge-set structure that holds the
//! dependency topology. It is wrapped in `Arc<RwLock<>>` by the engine for
//! concurrent-reader access and is itself not thread-safe.

use crate::domain::ItemId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Inner graph structure (not thread-safe).
///
/// # Graph Representation
///
/// The dependency graph uses petgraph's `DiGraph` with edges directed from
/// **dependent to blocker** (source -> target means source depends on
/// target). Edge weights carry no data; the relationship itself is the
/// information.
///
/// Nodes have no independent lifecycle: an item appears in the graph when
/// its first edge is added and is pruned when its last edge is removed.
/// `edge_set` mirrors the petgraph edges as id pairs for O(1) membership
/// checks.
pub(crate) struct GraphInner {
    /// Dependency graph. Edge direction: source (dependent) -> target (blocker).
    pub(super) graph: DiGraph<ItemId, ()>,

    /// Mapping from ItemId to graph NodeIndex.
    ///
    /// Every node in `self.graph` has exactly one entry here, and vice
    /// versa. Repaired on node removal because petgraph swap-removes.
    pub(super) node_map: HashMap<ItemId, NodeIndex>,

    /// Direct edge membership as `(dependent, blocker)` pairs.
    edge_set: HashSet<(ItemId, ItemId)>,
}

impl GraphInner {
    /// Create an empty graph
    pub(crate) fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            edge_set: HashSet::new(),
        }
    }

    /// Look up the node index for an item, if it participates in any edge.
    pub(super) fn node_of(&self, id: &ItemId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// O(1) membership check on the direct edge set.
    pub(crate) fn contains_edge(&self, dependent: &ItemId, blocker: &ItemId) -> bool {
        self.edge_set
            .contains(&(dependent.clone(), blocker.clone()))
    }

    /// Insert the edge `dependent -> blocker`, creating nodes as needed.
    ///
    /// Callers must have already rejected self-edges and duplicates and
    /// verified acyclicity; this method only records the edge.
    pub(crate) fn insert_edge(&mut self, dependent: &ItemId, blocker: &ItemId) {
        let from = self.ensure_node(dependent);
        let to = self.ensure_node(blocker);
        self.graph.add_edge(from, to, ());
        self.edge_set.insert((dependent.clone(), blocker.clone()));
    }

    /// Remove the edge `dependent -> blocker` if present.
    ///
    /// Returns `true` if an edge was removed. Endpoints left without any
    /// edge are pruned from the graph.
    pub(crate) fn remove_edge(&mut self, dependent: &ItemId, blocker: &ItemId) -> bool {
        if !self
            .edge_set
            .remove(&(dependent.clone(), blocker.clone()))
        {
            return false;
        }

        // edge_set and graph are kept in sync, so both nodes and the edge
        // must exist here.
        let from = self.node_map[dependent];
        let to = self.node_map[blocker];
        if let Some(edge) = self.graph.find_edge(from, to) {
            self.graph.remove_edge(edge);
        }

        // Prune blocker first: removing a node invalidates the highest
        // NodeIndex, so re-resolve the dependent through the map afterwards.
        self.prune_if_isolated(blocker);
        self.prune_if_isolated(dependent);

        true
    }

    /// Direct blockers of an item: targets of its outgoing edges.
    ///
    /// Sorted by id for deterministic output. Unknown items have no edges
    /// and yield an empty vec.
    pub(crate) fn direct_blockers_of(&self, item: &ItemId) -> Vec<ItemId> {
        self.neighbors_sorted(item, Direction::Outgoing)
    }

    /// Direct dependents of an item: sources of its incoming edges.
    ///
    /// Sorted by id. Unknown items yield an empty vec.
    pub(crate) fn direct_dependents_of(&self, item: &ItemId) -> Vec<ItemId> {
        self.neighbors_sorted(item, Direction::Incoming)
    }

    /// Number of items participating in at least one edge.
    pub(crate) fn item_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    pub(crate) fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn ensure_node(&mut self, id: &ItemId) -> NodeIndex {
        if let Some(node) = self.node_map.get(id) {
            return *node;
        }
        let node = self.graph.add_node(id.clone());
        self.node_map.insert(id.clone(), node);
        node
    }

    fn neighbors_sorted(&self, item: &ItemId, direction: Direction) -> Vec<ItemId> {
        let Some(node) = self.node_of(item) else {
            return Vec::new();
        };

        let mut neighbors: Vec<ItemId> = self
            .graph
            .edges_directed(node, direction)
            .map(|edge| {
                let neighbor = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.graph[neighbor].clone()
            })
            .collect();
        neighbors.sort();
        neighbors
    }

    /// Drop a node that no longer touches any edge.
    ///
    /// petgraph's `remove_node` swap-removes: the node that held the highest
    /// index moves into the freed slot, so its `node_map` entry is repaired.
    fn prune_if_isolated(&mut self, id: &ItemId) {
        let Some(node) = self.node_of(id) else {
            return;
        };
        if self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .next()
            .is_some()
            || self
                .graph
                .edges_directed(node, Direction::Incoming)
                .next()
                .is_some()
        {
            return;
        }

        self.graph.remove_node(node);
        self.node_map.remove(id);

        if let Some(moved) = self.graph.node_weight(node).cloned() {
            self.node_map.insert(moved, node);
        }
    }
}
