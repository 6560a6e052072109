//! Hacker News Firebase API source with TTL caching

use super::traits::ItemSource;
use crate::config::{CacheConfig, UpstreamConfig};
use crate::error::{Error, Result};
use crate::types::{Fetched, Item, ItemId};
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use url::Url;

const BEST_IDS_PATH: &str = "beststories.json";
const BEST_IDS_KEY: &str = "beststories";

/// Item source backed by the Hacker News Firebase API
///
/// The ID list and individual items are cached independently: the list
/// changes every few seconds upstream and gets a short TTL, item bodies are
/// close to immutable and get a longer one. Expired entries are reclaimed by
/// the cache itself. Failed or missing lookups are never cached.
pub struct HackerNewsSource {
    /// HTTP client for upstream requests
    http_client: reqwest::Client,

    /// Base URL, always ending with `/`
    base_url: Url,

    /// Cached best-stories ID list (single entry)
    ids_cache: Cache<&'static str, Vec<ItemId>>,

    /// Cached items keyed by identifier, optionally capacity-bounded
    item_cache: Cache<ItemId, Item>,
}

impl HackerNewsSource {
    /// Create a new source from upstream and cache configuration
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be created
    pub fn new(upstream: &UpstreamConfig, cache: &CacheConfig) -> Result<Self> {
        let base_url = upstream.parsed_base_url()?;

        let http_client = reqwest::Client::builder()
            .timeout(upstream.request_timeout)
            .user_agent(upstream.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        let ids_cache = Cache::builder().time_to_live(cache.ids_ttl).build();

        let mut item_cache = Cache::builder().time_to_live(cache.item_ttl);
        if let Some(max) = cache.max_items {
            item_cache = item_cache.max_capacity(max.max(1));
        }

        debug!(
            base_url = %base_url,
            ids_ttl = ?cache.ids_ttl,
            item_ttl = ?cache.item_ttl,
            max_items = ?cache.max_items,
            "Hacker News source configured"
        );

        Ok(Self {
            http_client,
            base_url,
            ids_cache,
            item_cache: item_cache.build(),
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Number of live cached items
    ///
    /// Flushes the cache's pending maintenance first, so expired and evicted
    /// entries are no longer counted.
    pub async fn cached_items(&self) -> u64 {
        self.item_cache.run_pending_tasks().await;
        self.item_cache.entry_count()
    }

    /// GET `path` relative to the base URL and decode its JSON body
    ///
    /// A 404 or a JSON `null` body yields `Ok(None)`.
    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Other(format!("Invalid upstream path '{}': {}", path, e)))?;

        let response = self.http_client.get(url.clone()).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice::<Option<T>>(&body)?)
    }
}

/// Transport-level failures are expected now and then; anything else is a bug
/// or a contract change upstream.
fn is_transport_failure(error: &Error) -> bool {
    matches!(error, Error::Network(_) | Error::UpstreamStatus { .. })
}

#[async_trait]
impl ItemSource for HackerNewsSource {
    async fn best_ids(&self, cancel: &CancellationToken) -> Fetched<Vec<ItemId>> {
        if let Some(ids) = self.ids_cache.get(BEST_IDS_KEY).await {
            return Fetched::Found(ids);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Fetched::Cancelled,
            result = self.fetch_json::<Vec<ItemId>>(BEST_IDS_PATH) => result,
        };

        match result {
            Ok(Some(ids)) => {
                debug!(count = ids.len(), "Fetched best story IDs");
                self.ids_cache.insert(BEST_IDS_KEY, ids.clone()).await;
                Fetched::Found(ids)
            }
            Ok(None) => {
                warn!("Upstream returned no best story IDs");
                Fetched::Absent
            }
            Err(e) if is_transport_failure(&e) => {
                warn!(error = %e, "Failed to retrieve best story IDs");
                Fetched::Absent
            }
            Err(e) => {
                error!(error = %e, "Unexpected error while retrieving best story IDs");
                Fetched::Absent
            }
        }
    }

    async fn item(&self, id: ItemId, cancel: &CancellationToken) -> Fetched<Item> {
        if let Some(item) = self.item_cache.get(&id).await {
            return Fetched::Found(item);
        }

        let path = format!("item/{}.json", id);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Fetched::Cancelled,
            result = self.fetch_json::<Item>(&path) => result,
        };

        match result {
            Ok(Some(item)) => {
                self.item_cache.insert(id, item.clone()).await;
                Fetched::Found(item)
            }
            Ok(None) => {
                debug!(item_id = %id, "Item not found upstream");
                Fetched::Absent
            }
            Err(e) if is_transport_failure(&e) => {
                warn!(item_id = %id, error = %e, "Failed to retrieve item");
                Fetched::Absent
            }
            Err(e) => {
                error!(item_id = %id, error = %e, "Unexpected error while retrieving item");
                Fetched::Absent
            }
        }
    }

    fn name(&self) -> &'static str {
        "hacker-news"
    }
}
