//! Best-stories ranking pipeline
//!
//! Fetches the candidate ID list, fans out item lookups with bounded
//! concurrency, keeps only stories and orders them by score.

use crate::config::{MAX_LIMIT, RankingConfig};
use crate::error::{Error, Result};
use crate::source::ItemSource;
use crate::types::{Fetched, Item, ItemId};
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Produces the top-N stories from an [`ItemSource`]
///
/// Cheap to share behind an `Arc`; all state lives in the source's caches.
pub struct StoryAggregator {
    source: Arc<dyn ItemSource>,
    ranking: RankingConfig,
}

impl StoryAggregator {
    /// Create an aggregator over `source`
    pub fn new(source: Arc<dyn ItemSource>, ranking: RankingConfig) -> Self {
        Self { source, ranking }
    }

    /// The underlying item source
    pub fn source(&self) -> &Arc<dyn ItemSource> {
        &self.source
    }

    /// Pipeline settings in use
    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    /// Return up to `limit` stories ordered by score, highest first
    ///
    /// Ties on score are broken by newer `time` first, then by higher id.
    /// Items that are missing, failed to load or are not stories are
    /// skipped silently, so fewer than `limit` entries may come back.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLimit`] if `limit` is outside `1..=100`; the source is
    ///   not contacted
    /// - [`Error::Cancelled`] if `cancel` fires before the result is assembled
    pub async fn best_stories(&self, limit: i64, cancel: &CancellationToken) -> Result<Vec<Item>> {
        let limit = validate_limit(limit)?;

        let ids = match self.source.best_ids(cancel).await {
            Fetched::Found(ids) => ids,
            Fetched::Absent => {
                debug!("No candidate IDs available, returning empty result");
                return Ok(Vec::new());
            }
            Fetched::Cancelled => return Err(Error::Cancelled),
        };

        let candidates: Vec<ItemId> = ids
            .into_iter()
            .take(self.ranking.max_ids_to_fetch)
            .collect();
        let candidate_count = candidates.len();

        let items = self.fetch_items(candidates, cancel).await?;

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let fetched = items.len();
        let stories = rank_stories(items, limit);

        info!(
            limit,
            candidates = candidate_count,
            fetched,
            returned = stories.len(),
            "Ranked best stories"
        );

        Ok(stories)
    }

    /// Look up every candidate with at most `max_concurrency` in flight
    ///
    /// Each lookup runs in its own task behind a semaphore permit and hands
    /// back its own outcome; outcomes are folded after the join. Returns as
    /// soon as any lookup reports cancellation, aborting the tasks still
    /// pending when the `JoinSet` drops.
    async fn fetch_items(&self, ids: Vec<ItemId>, cancel: &CancellationToken) -> Result<Vec<Item>> {
        let gate = Arc::new(Semaphore::new(self.ranking.max_concurrency.max(1)));
        let mut lookups = JoinSet::new();

        for id in ids {
            let source = Arc::clone(&self.source);
            let gate = Arc::clone(&gate);
            let cancel = cancel.clone();

            lookups.spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return (id, Fetched::Cancelled),
                    permit = gate.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        // Closed gate: nothing more will be admitted
                        Err(_) => return (id, Fetched::Absent),
                    },
                };
                (id, source.item(id, &cancel).await)
            });
        }

        let mut items = Vec::new();
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((_, Fetched::Found(item))) => items.push(item),
                Ok((id, Fetched::Absent)) => debug!(item_id = %id, "Skipping unavailable item"),
                Ok((_, Fetched::Cancelled)) => return Err(Error::Cancelled),
                Err(e) => error!(error = %e, "Item lookup task failed"),
            }
        }

        Ok(items)
    }
}

/// Check a requested story count and convert it to a `usize`
///
/// # Errors
///
/// Returns [`Error::InvalidLimit`] unless `1 <= limit <= 100`.
pub fn validate_limit(limit: i64) -> Result<usize> {
    match usize::try_from(limit) {
        Ok(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
        _ => Err(Error::InvalidLimit {
            limit,
            max: MAX_LIMIT,
        }),
    }
}

/// Keep only stories, order them and cut the list to `limit`
///
/// Ordering: score descending, then time descending, then id descending.
/// Absent score and time count as 0.
pub fn rank_stories(items: Vec<Item>, limit: usize) -> Vec<Item> {
    let mut stories: Vec<Item> = items.into_iter().filter(Item::is_story).collect();

    stories.sort_by_key(|item| {
        (
            Reverse(item.score_or_zero()),
            Reverse(item.time_or_zero()),
            Reverse(item.id),
        )
    });
    stories.truncate(limit);
    stories
}
