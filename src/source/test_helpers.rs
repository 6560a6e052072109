//! In-memory item source and fixtures for unit tests

use super::traits::ItemSource;
use crate::types::{Fetched, Item, ItemId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Build a story item with deterministic author, title and URL
pub fn story_with(id: u64, score: i64, time: i64) -> Item {
    Item {
        id: ItemId(id),
        by: Some(format!("author{}", id)),
        title: Some(format!("Story {}", id)),
        score: Some(score),
        url: Some(format!("https://example.com/{}", id)),
        time: Some(time),
        descendants: Some(0),
        kind: Some("story".to_string()),
        kids: None,
    }
}

/// Same as [`story_with`] but as the JSON the upstream API would serve
pub fn story_json(id: u64, score: i64, time: i64) -> serde_json::Value {
    serde_json::to_value(story_with(id, score, time)).unwrap()
}

/// Build an item of an arbitrary kind
pub fn item_of_kind(id: u64, score: i64, kind: &str) -> Item {
    Item {
        kind: Some(kind.to_string()),
        ..story_with(id, score, 0)
    }
}

/// Scripted [`ItemSource`] that records how it was called
pub struct FakeSource {
    ids: Fetched<Vec<ItemId>>,
    items: HashMap<ItemId, Fetched<Item>>,
    delay: Option<Duration>,
    id_calls: AtomicUsize,
    item_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSource {
    /// Source whose ID list is `ids`; every item lookup is absent until added
    pub fn with_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Self::with_id_outcome(Fetched::Found(ids.into_iter().map(ItemId).collect()))
    }

    /// Source whose ID lookup resolves to `outcome`
    pub fn with_id_outcome(outcome: Fetched<Vec<ItemId>>) -> Self {
        Self {
            ids: outcome,
            items: HashMap::new(),
            delay: None,
            id_calls: AtomicUsize::new(0),
            item_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Serve `item` for its own identifier
    pub fn item(mut self, item: Item) -> Self {
        self.items.insert(item.id, Fetched::Found(item));
        self
    }

    /// Resolve the lookup for `id` to `outcome`
    pub fn outcome(mut self, id: u64, outcome: Fetched<Item>) -> Self {
        self.items.insert(ItemId(id), outcome);
        self
    }

    /// Sleep this long inside every item lookup
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn id_calls(&self) -> usize {
        self.id_calls.load(Ordering::SeqCst)
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }

    /// Highest number of item lookups observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSource for FakeSource {
    async fn best_ids(&self, cancel: &CancellationToken) -> Fetched<Vec<ItemId>> {
        self.id_calls.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Fetched::Cancelled;
        }
        self.ids.clone()
    }

    async fn item(&self, id: ItemId, cancel: &CancellationToken) -> Fetched<Item> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = match self.delay {
            Some(delay) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Fetched::Cancelled,
                    _ = tokio::time::sleep(delay) => self.lookup(id),
                }
            }
            None if cancel.is_cancelled() => Fetched::Cancelled,
            None => self.lookup(id),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

impl FakeSource {
    fn lookup(&self, id: ItemId) -> Fetched<Item> {
        self.items.get(&id).cloned().unwrap_or(Fetched::Absent)
    }
}
