//! Work-item lookup boundary.
//!
//! The engine treats items as opaque ids; whenever a query needs display
//! metadata (title, status) it goes through the [`ItemLookup`] trait. Any
//! type providing `resolve` can back the engine - the real item store in
//! production, [`InMemoryLookup`] in tests and embedded setups.

use crate::domain::{ItemId, ItemSummary};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Capability interface for resolving work-item display metadata.
///
/// The trait is object-safe so the engine can hold `Arc<dyn ItemLookup>`
/// and swap implementations without generics at the call sites. The engine
/// never mutates item metadata through this boundary.
#[async_trait]
pub trait ItemLookup: Send + Sync {
    /// Resolve an item id to its display summary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ItemNotFound`] if the id is unknown to the item
    /// store.
    async fn resolve(&self, id: &ItemId) -> Result<ItemSummary>;
}

/// In-memory [`ItemLookup`] implementation.
///
/// A `RwLock<HashMap>` of summaries, suitable for tests and for embedders
/// that keep their item catalog in process. Not persistent.
#[derive(Debug, Default)]
pub struct InMemoryLookup {
    items: RwLock<HashMap<ItemId, ItemSummary>>,
}

impl InMemoryLookup {
    /// Create an empty lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an item summary.
    pub async fn insert(&self, summary: ItemSummary) {
        let mut items = self.items.write().await;
        items.insert(summary.id.clone(), summary);
    }

    /// Remove an item summary. Removing an unknown id is a no-op.
    pub async fn remove(&self, id: &ItemId) {
        let mut items = self.items.write().await;
        items.remove(id);
    }

    /// Number of registered items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the lookup has no registered items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemLookup for InMemoryLookup {
    async fn resolve(&self, id: &ItemId) -> Result<ItemSummary> {
        let items = self.items.read().await;
        items
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ItemNotFound(id.clone()))
    }
}
