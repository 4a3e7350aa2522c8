//! Domain types for dependency tracking.
//!
//! This module contains the core types shared between the engine and its
//! callers. Work items themselves are owned elsewhere; the engine only sees
//! their ids and, for reports, the summary returned by the lookup boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a work item.
///
/// Ids are issued by the surrounding tracker (UUIDs or prefixed short ids);
/// the engine never parses or generates them. Ordering is plain lexicographic
/// string order and is used for deterministic tie-breaking in queries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create a new item id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Workflow status of a work item, as reported by the lookup boundary.
///
/// Display metadata only: the engine never branches on status. It is carried
/// so reports can show where each item sits in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Item is open and ready to work on
    Open,

    /// Item is currently being worked on
    InProgress,

    /// Item is blocked by dependencies
    Blocked,

    /// Item has been completed
    Done,
}

/// Display metadata for a work item, resolved via [`crate::lookup::ItemLookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    /// The item's id
    pub id: ItemId,

    /// Item title
    pub title: String,

    /// Current workflow status
    pub status: WorkStatus,
}

/// Per-item dependency view: what blocks this item, and what it blocks.
///
/// Both lists contain only **direct** neighbors; use
/// [`crate::engine::DependencyEngine::transitive_dependents`] for cascading
/// impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    /// The item the report is about
    pub item: ItemSummary,

    /// Items this item directly depends on (its blockers)
    pub blocked_by: Vec<ItemSummary>,

    /// Items directly depending on this item (what it is blocking)
    pub blocking: Vec<ItemSummary>,
}

/// One row of the blocker ranking: an item and how many items it blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingItem {
    /// The blocking item's id
    pub id: ItemId,

    /// Number of items directly depending on it
    pub dependent_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_display_and_conversions() {
        let id = ItemId::from("WI-123");
        assert_eq!(id.to_string(), "WI-123");
        assert_eq!(id.as_str(), "WI-123");
        assert_eq!(ItemId::from("WI-123".to_string()), id);
        assert_eq!(ItemId::new("WI-123"), id);
    }

    #[test]
    fn item_id_orders_lexicographically() {
        assert!(ItemId::from("A") < ItemId::from("B"));
        assert!(ItemId::from("WI-10") < ItemId::from("WI-9"));
    }

    #[test]
    fn work_status_serializes_snake_case() {
        let json = serde_json::to_string(&WorkStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
