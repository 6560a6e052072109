//! Core types for hn-best-stories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for an upstream item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Create a new ItemId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ItemId> for u64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl PartialEq<u64> for ItemId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One upstream entity (story, job, comment, poll, pollopt, ...)
///
/// Field names follow the upstream JSON. Items are values: they are never
/// mutated after deserialization, a stale cache entry is replaced wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Upstream identifier
    pub id: ItemId,

    /// Author handle
    #[serde(default)]
    pub by: Option<String>,

    /// Title
    #[serde(default)]
    pub title: Option<String>,

    /// Score (votes)
    #[serde(default)]
    pub score: Option<i64>,

    /// External URL
    #[serde(default)]
    pub url: Option<String>,

    /// Creation time in Unix epoch seconds
    #[serde(default)]
    pub time: Option<i64>,

    /// Total comment count
    #[serde(default)]
    pub descendants: Option<i64>,

    /// Kind tag ("story", "job", "comment", "poll", "pollopt")
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Child comment identifiers
    #[serde(default)]
    pub kids: Option<Vec<ItemId>>,
}

impl Item {
    /// Score with absent treated as 0
    pub fn score_or_zero(&self) -> i64 {
        self.score.unwrap_or(0)
    }

    /// Creation time with absent treated as 0
    pub fn time_or_zero(&self) -> i64 {
        self.time.unwrap_or(0)
    }

    /// Comment count with absent treated as 0
    pub fn descendants_or_zero(&self) -> i64 {
        self.descendants.unwrap_or(0)
    }

    /// Whether the kind tag is "story" (case-insensitive)
    pub fn is_story(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("story"))
    }
}

/// Outcome of an item source lookup
///
/// Transport failures and "no such item" both collapse into `Absent`;
/// cancellation stays distinguishable so callers never mistake it for an
/// empty answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The value was retrieved (from cache or upstream)
    Found(T),
    /// Nothing usable: not found, unavailable or malformed
    Absent,
    /// The caller cancelled before the lookup completed
    Cancelled,
}

impl<T> Fetched<T> {
    /// Convert into an `Option`, treating cancellation as absence
    pub fn found(self) -> Option<T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Absent | Fetched::Cancelled => None,
        }
    }

    /// Whether this outcome is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Fetched::Cancelled)
    }
}

/// Story as returned by the REST API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryView {
    /// Story title
    pub title: Option<String>,

    /// Link to the story
    pub uri: Option<String>,

    /// Author handle
    pub posted_by: Option<String>,

    /// Creation time as ISO 8601 with offset, e.g. "2019-10-12T13:43:01+00:00"
    pub time: Option<String>,

    /// Score (0 when unknown)
    pub score: i64,

    /// Number of comments (0 when unknown)
    pub comment_count: i64,
}

impl From<&Item> for StoryView {
    fn from(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            uri: item.url.clone(),
            posted_by: item.by.clone(),
            time: item.time.and_then(format_epoch_seconds),
            score: item.score_or_zero(),
            comment_count: item.descendants_or_zero(),
        }
    }
}

fn format_epoch_seconds(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64) -> Item {
        Item {
            id: ItemId(id),
            by: Some("ismaildonmez".into()),
            title: Some("A uBlock Origin update was rejected from the Chrome Web Store".into()),
            score: Some(1716),
            url: Some("https://github.com/uBlockOrigin/uBlock-issues/issues/745".into()),
            time: Some(1570887781),
            descendants: Some(572),
            kind: Some("story".into()),
            kids: Some(vec![ItemId(21233041), ItemId(21233229)]),
        }
    }

    #[test]
    fn item_deserializes_upstream_json() {
        let json = r#"{
            "by": "dhouston",
            "descendants": 71,
            "id": 8863,
            "kids": [8952, 9224],
            "score": 111,
            "time": 1175714200,
            "title": "My YC app: Dropbox - Throw away your USB drive",
            "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, ItemId(8863));
        assert_eq!(item.by.as_deref(), Some("dhouston"));
        assert_eq!(item.kind.as_deref(), Some("story"));
        assert_eq!(item.kids, Some(vec![ItemId(8952), ItemId(9224)]));
        assert!(item.is_story());
    }

    #[test]
    fn item_with_only_id_defaults_everything_else() {
        let item: Item = serde_json::from_str(r#"{"id": 5}"#).unwrap();

        assert_eq!(item.score_or_zero(), 0);
        assert_eq!(item.time_or_zero(), 0);
        assert_eq!(item.descendants_or_zero(), 0);
        assert!(!item.is_story());
    }

    #[test]
    fn item_ignores_unknown_fields() {
        let item: Item =
            serde_json::from_str(r#"{"id": 5, "type": "poll", "parts": [6, 7], "dead": true}"#)
                .unwrap();

        assert_eq!(item.kind.as_deref(), Some("poll"));
    }

    #[test]
    fn is_story_is_case_insensitive() {
        let mut item = story(1);
        for kind in ["story", "Story", "STORY"] {
            item.kind = Some(kind.into());
            assert!(item.is_story(), "{kind} should count as a story");
        }
        for kind in ["job", "comment", "poll", "pollopt", "stories", ""] {
            item.kind = Some(kind.into());
            assert!(!item.is_story(), "{kind} should not count as a story");
        }
    }

    #[test]
    fn story_view_maps_fields_and_formats_time() {
        let view = StoryView::from(&story(21233041));

        assert_eq!(
            view.title.as_deref(),
            Some("A uBlock Origin update was rejected from the Chrome Web Store")
        );
        assert_eq!(
            view.uri.as_deref(),
            Some("https://github.com/uBlockOrigin/uBlock-issues/issues/745")
        );
        assert_eq!(view.posted_by.as_deref(), Some("ismaildonmez"));
        assert_eq!(view.time.as_deref(), Some("2019-10-12T13:43:01+00:00"));
        assert_eq!(view.score, 1716);
        assert_eq!(view.comment_count, 572);
    }

    #[test]
    fn story_view_defaults_missing_numbers_to_zero() {
        let item: Item = serde_json::from_str(r#"{"id": 9, "type": "story"}"#).unwrap();
        let view = StoryView::from(&item);

        assert_eq!(view.score, 0);
        assert_eq!(view.comment_count, 0);
        assert_eq!(view.time, None);
    }

    #[test]
    fn story_view_serializes_camel_case() {
        let json = serde_json::to_value(StoryView::from(&story(1))).unwrap();

        assert!(json.get("postedBy").is_some());
        assert!(json.get("commentCount").is_some());
        assert!(json.get("posted_by").is_none());
    }

    #[test]
    fn fetched_found_converts_to_option() {
        assert_eq!(Fetched::Found(3).found(), Some(3));
        assert_eq!(Fetched::<u8>::Absent.found(), None);
        assert_eq!(Fetched::<u8>::Cancelled.found(), None);
        assert!(Fetched::<u8>::Cancelled.is_cancelled());
        assert!(!Fetched::<u8>::Absent.is_cancelled());
    }
}
