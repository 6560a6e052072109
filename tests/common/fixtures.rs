//! Mock Hacker News upstream built on wiremock

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Upstream stories: (id, author, title, score, time, descendants)
pub const STORIES: [(u64, &str, &str, i64, i64, i64); 3] = [
    (
        1,
        "ismaildonmez",
        "A uBlock Origin update was rejected from the Chrome Web Store",
        1716,
        1570881781,
        572,
    ),
    (2, "alice", "Second story", 900, 1600000000, 10),
    (3, "bob", "Third story", 500, 1600001000, 3),
];

/// JSON body for one upstream story
pub fn story_body(id: u64, by: &str, title: &str, score: i64, time: i64, descendants: i64) -> Value {
    json!({
        "id": id,
        "by": by,
        "title": title,
        "score": score,
        "time": time,
        "descendants": descendants,
        "type": "story",
        "url": format!("https://example.com/{}", id),
    })
}

/// Base URL a source should be configured with for `server`
pub fn base_url(server: &MockServer) -> String {
    format!("{}/v0/", server.uri())
}

/// Serve `ids` as the best-stories list, expecting `calls` requests
pub async fn mount_best_ids(server: &MockServer, ids: &[u64], calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v0/beststories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ids))
        .expect(calls)
        .mount(server)
        .await;
}

/// Serve `body` for item `id`, expecting `calls` requests
pub async fn mount_item(server: &MockServer, id: u64, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Answer item `id` with `status` and an empty body
pub async fn mount_item_status(server: &MockServer, id: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount the three fixture stories, each expected to be fetched once
pub async fn mount_fixture_upstream(server: &MockServer) {
    mount_best_ids(server, &[1, 2, 3], 1).await;
    for (id, by, title, score, time, descendants) in STORIES {
        mount_item(server, id, story_body(id, by, title, score, time, descendants), 1).await;
    }
}
