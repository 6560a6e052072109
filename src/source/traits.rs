//! Trait for upstream item lookups

use crate::types::{Fetched, Item, ItemId};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Read-only access to the upstream ID list and items
///
/// Implementations own whatever caching they do and must never surface
/// transport errors: a lookup either yields a value, yields nothing, or
/// reports that `cancel` fired first.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Current best-stories identifiers in upstream priority order
    ///
    /// `Absent` covers both an upstream failure and an upstream `null`.
    async fn best_ids(&self, cancel: &CancellationToken) -> Fetched<Vec<ItemId>>;

    /// A single item by identifier
    ///
    /// "No such item" is reported as `Absent`, not as a failure.
    async fn item(&self, id: ItemId, cancel: &CancellationToken) -> Fetched<Item>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
