//! Dependency graph and critical-path engine.
//!
//! This module owns the blocking topology: a directed edge set over opaque
//! work-item ids, kept acyclic at every mutation, plus the analysis queries
//! built on top of it (critical path, blocker ranking, cascading impact).
//!
//! # Graph Representation and Edge Direction Convention
//!
//! Edges run **dependent -> blocker**: if item A cannot complete until item
//! B does, the edge is `A -> B`.
//!
//! - `direct_blockers_of(A)` follows outgoing edges (what A waits on)
//! - `direct_dependents_of(B)` follows incoming edges (what waits on B)
//! - the critical path runs in edge order, deepest dependent first
//!
//! Nodes exist implicitly: an item joins the graph with its first edge and
//! leaves it when its last edge is removed. Items are never created or
//! deleted here; that is the surrounding tracker's job, which dissolves a
//! deleted item's edges through repeated [`DependencyEngine::remove_dependency`]
//! calls.
//!
//! # Acyclicity
//!
//! The graph is a DAG at all times. Every [`DependencyEngine::add_dependency`]
//! runs a reachability check under the write lock and rejects edges that
//! would close a cycle, reporting the full offending path. Queries that walk
//! the graph still refuse to loop if a cycle somehow appears (defensive
//! toposort), so no operation can hang on a corrupted graph.
//!
//! # Thread Safety
//!
//! State lives in `Arc<RwLock<GraphInner>>` (tokio's `RwLock`): queries take
//! the read lock and run concurrently, mutations take the write lock and are
//! mutually exclusive. A mutation is applied entirely under one write guard,
//! so no query can observe a half-applied edge (e.g. visible to
//! `has_dependency` but missing from `direct_dependents_of`).
//!
//! # Performance Characteristics
//!
//! - `has_dependency`: O(1) on the mirrored edge set
//! - `add_dependency` / `remove_dependency`: O(V+E) (cycle check / pruning)
//! - direct neighbor queries: O(degree log degree) (sorted output)
//! - `find_critical_path`, `transitive_dependents`, blocker queries: O(V+E)
//! - `parallel_paths`: output-sensitive, exponential on dense graphs

mod blockers;
mod critical_path;
mod cycle;
mod impact;
mod inner;

use crate::domain::{BlockingItem, DependencyReport, ItemId};
use crate::error::{Error, Result};
use crate::lookup::ItemLookup;
use inner::GraphInner;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The dependency engine: edge mutations gated by cycle detection, and the
/// analysis queries built on the resulting DAG.
///
/// Cloning is cheap and shares the same graph and lookup; construct one
/// engine per item universe and hand out clones.
#[derive(Clone)]
pub struct DependencyEngine {
    /// Lookup boundary for display metadata (never mutated through here)
    lookup: Arc<dyn ItemLookup>,

    /// The shared edge set; readers concurrent, writers exclusive
    graph: Arc<RwLock<GraphInner>>,
}

impl std::fmt::Debug for DependencyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyEngine")
            .field("lookup", &"<dyn ItemLookup>")
            .finish_non_exhaustive()
    }
}

impl DependencyEngine {
    /// Create an engine backed by the given lookup, with an empty graph.
    pub fn new(lookup: Arc<dyn ItemLookup>) -> Self {
        Self {
            lookup,
            graph: Arc::new(RwLock::new(GraphInner::new())),
        }
    }

    // ========== Mutation ==========

    /// Record that `dependent` cannot complete until `blocker` does.
    ///
    /// Re-adding an existing edge is an idempotent no-op. Both ids must
    /// resolve through the lookup boundary; resolution happens before the
    /// write lock is taken so a slow lookup never stalls readers.
    ///
    /// # Errors
    ///
    /// - [`Error::SelfDependency`] if `dependent == blocker`
    /// - [`Error::ItemNotFound`] if either id does not resolve
    /// - [`Error::CycleDetected`] if the edge would close a cycle; the graph
    ///   is left unchanged and the error carries the would-be cycle path
    pub async fn add_dependency(&self, dependent: &ItemId, blocker: &ItemId) -> Result<()> {
        if dependent == blocker {
            return Err(Error::SelfDependency(dependent.clone()));
        }

        self.lookup.resolve(dependent).await?;
        self.lookup.resolve(blocker).await?;

        let mut graph = self.graph.write().await;

        if graph.contains_edge(dependent, blocker) {
            tracing::trace!(%dependent, %blocker, "dependency already present, no-op");
            return Ok(());
        }

        if let Some(path) = cycle::would_close_cycle(&graph.graph, &graph.node_map, dependent, blocker)
        {
            tracing::debug!(%dependent, %blocker, "dependency rejected, would create cycle");
            return Err(Error::CycleDetected { path });
        }

        graph.insert_edge(dependent, blocker);
        tracing::debug!(%dependent, %blocker, "dependency added");
        Ok(())
    }

    /// Remove the edge `dependent -> blocker`.
    ///
    /// Returns `true` if an edge was removed, `false` if there was nothing
    /// to remove. Never an error: removal is idempotent so bulk teardown
    /// (e.g. dissolving a deleted item's edges) can be retried safely.
    pub async fn remove_dependency(&self, dependent: &ItemId, blocker: &ItemId) -> bool {
        let mut graph = self.graph.write().await;
        let removed = graph.remove_edge(dependent, blocker);
        if removed {
            tracing::debug!(%dependent, %blocker, "dependency removed");
        }
        removed
    }

    // ========== Structural queries ==========

    /// Whether the direct edge `dependent -> blocker` exists.
    pub async fn has_dependency(&self, dependent: &ItemId, blocker: &ItemId) -> bool {
        let graph = self.graph.read().await;
        graph.contains_edge(dependent, blocker)
    }

    /// Items directly blocking `item`, sorted by id.
    ///
    /// An id with no recorded edges yields an empty vec; pure graph queries
    /// never consult the lookup.
    pub async fn direct_blockers_of(&self, item: &ItemId) -> Vec<ItemId> {
        let graph = self.graph.read().await;
        graph.direct_blockers_of(item)
    }

    /// Items directly blocked by `item`, sorted by id.
    pub async fn direct_dependents_of(&self, item: &ItemId) -> Vec<ItemId> {
        let graph = self.graph.read().await;
        graph.direct_dependents_of(item)
    }

    /// Number of items currently participating in at least one edge.
    pub async fn item_count(&self) -> usize {
        self.graph.read().await.item_count()
    }

    /// Number of dependency edges.
    pub async fn edge_count(&self) -> usize {
        self.graph.read().await.edge_count()
    }

    // ========== Path analysis ==========

    /// One longest chain of unresolved dependencies, in edge order.
    ///
    /// Deterministic: repeated calls on an unchanged graph return the same
    /// path, and ties are broken by lexicographic id (see
    /// [`crate::engine`] module docs). Empty graph yields an empty vec.
    ///
    /// # Errors
    ///
    /// [`Error::CycleDetected`] only if the graph somehow contains a cycle;
    /// unreachable through this engine's mutations.
    pub async fn find_critical_path(&self) -> Result<Vec<ItemId>> {
        let graph = self.graph.read().await;
        critical_path::find_critical_path_impl(&graph.graph)
    }

    /// Longest blocker chain hanging off `item`, starting with `item`.
    ///
    /// Answers "how deep is this item's wait": `[item]` means nothing
    /// blocks it, `[item, b1, b2]` means clearing `b2` then `b1` is the
    /// minimum sequence before `item` can proceed along its deepest chain.
    /// An id with no recorded edges yields an empty vec.
    ///
    /// # Errors
    ///
    /// [`Error::CycleDetected`] on a corrupted graph (defensive).
    pub async fn critical_path_from(&self, item: &ItemId) -> Result<Vec<ItemId>> {
        let graph = self.graph.read().await;
        let Some(node) = graph.node_of(item) else {
            return Ok(Vec::new());
        };
        critical_path::longest_chain_from(&graph.graph, node)
    }

    /// Every maximal dependency chain, longest first.
    ///
    /// Useful for spotting work that can proceed in parallel: each returned
    /// path is an independent source-to-sink chain. Equal lengths are
    /// ordered lexicographically. Output can be exponential on dense
    /// graphs; intended for human-scale reports.
    ///
    /// # Errors
    ///
    /// [`Error::CycleDetected`] on a corrupted graph (defensive).
    pub async fn parallel_paths(&self) -> Result<Vec<Vec<ItemId>>> {
        let graph = self.graph.read().await;
        critical_path::parallel_paths_impl(&graph.graph)
    }

    // ========== Blocker analysis ==========

    /// Items currently in the way, ranked by how many items each blocks.
    ///
    /// Ordered by dependent count descending, ties by id ascending.
    pub async fn find_blocking_items(&self) -> Vec<BlockingItem> {
        let graph = self.graph.read().await;
        blockers::find_blocking_items_impl(&graph.graph)
    }

    /// Graph participants with zero outstanding blockers, sorted by id.
    pub async fn find_ready_items(&self) -> Vec<ItemId> {
        let graph = self.graph.read().await;
        blockers::find_ready_items_impl(&graph.graph)
    }

    // ========== Impact analysis ==========

    /// Per-item dependency view with display metadata.
    ///
    /// Resolves the item, its direct blockers, and its direct dependents
    /// through the lookup boundary. The graph snapshot is taken first and
    /// the lock released before any lookup call, so resolution cost never
    /// blocks other queries.
    ///
    /// # Errors
    ///
    /// [`Error::ItemNotFound`] if the item or any of its neighbors fails to
    /// resolve.
    pub async fn dependency_report(&self, item: &ItemId) -> Result<DependencyReport> {
        let (blocker_ids, dependent_ids) = {
            let graph = self.graph.read().await;
            (
                graph.direct_blockers_of(item),
                graph.direct_dependents_of(item),
            )
        };

        let summary = self.lookup.resolve(item).await?;
        let blocked_by = impact::resolve_summaries(self.lookup.as_ref(), &blocker_ids).await?;
        let blocking = impact::resolve_summaries(self.lookup.as_ref(), &dependent_ids).await?;

        Ok(DependencyReport {
            item: summary,
            blocked_by,
            blocking,
        })
    }

    /// Everything that slips if `item` slips: the set of items reachable by
    /// repeatedly following direct dependents, sorted by id.
    ///
    /// `item` itself is excluded. An id with no recorded edges yields an
    /// empty vec.
    pub async fn transitive_dependents(&self, item: &ItemId) -> Vec<ItemId> {
        let graph = self.graph.read().await;
        let Some(node) = graph.node_of(item) else {
            return Vec::new();
        };
        impact::transitive_dependents_impl(&graph.graph, node)
    }
}
