//! Error types for trestle operations.

use crate::domain::ItemId;
use thiserror::Error;

/// The error type for dependency engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Referenced work item does not resolve via the lookup boundary.
    #[error("Work item not found: {0}")]
    ItemNotFound(ItemId),

    /// An item cannot depend on itself.
    #[error("Item cannot depend on itself: {0}")]
    SelfDependency(ItemId),

    /// Adding the requested dependency would close a cycle.
    ///
    /// `path` is the full cycle the edge would create, first node repeated
    /// at the end, so callers can show exactly which existing dependencies
    /// conflict with the request.
    #[error("Dependency would create a cycle: {}", format_cycle(.path))]
    CycleDetected {
        /// The offending cycle, e.g. `[A, B, C, A]` for `A -> B -> C -> A`
        path: Vec<ItemId>,
    },
}

/// A specialized Result type for trestle operations.
pub type Result<T> = std::result::Result<T, Error>;

fn format_cycle(path: &[ItemId]) -> String {
    path.iter()
        .map(ItemId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
