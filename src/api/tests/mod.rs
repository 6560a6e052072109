use super::*;
use crate::config::Config;
use crate::source::test_helpers::FakeSource;
use axum::body::Body;
use axum::extract::Request;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::StatusCode;
use axum::response::Response;
use std::net::SocketAddr;
use tower::ServiceExt;


/// Build a router over `source` with the connection info the rate limiter needs
fn test_router(source: FakeSource, config: Config) -> Router {
    let aggregator = Arc::new(StoryAggregator::new(
        Arc::new(source),
        config.ranking.clone(),
    ));
    create_router(aggregator, Arc::new(config))
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns_and_stops_on_shutdown() {
    let mut config = Config::default();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);
    let aggregator = Arc::new(StoryAggregator::new(
        Arc::new(FakeSource::with_ids(Vec::<u64>::new())),
        config.ranking.clone(),
    ));

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let api_handle = tokio::spawn(start_api_server(aggregator, config, async {
        rx.await.ok();
    }));

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), api_handle)
        .await
        .expect("server should stop after shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let mut config = Config::default();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];

    let app = test_router(FakeSource::with_ids(Vec::<u64>::new()), config);

    let request = Request::builder()
        .uri("/api/v1/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled_by_default() {
    let app = test_router(FakeSource::with_ids(Vec::<u64>::new()), Config::default());

    let request = Request::builder()
        .uri("/api/v1/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[test]
fn test_cors_specific_origins() {
    // Only checks that a layer can be built from an explicit list
    let _layer = build_cors_layer(&[
        "http://localhost:3000".to_string(),
        "not a header value\n".to_string(),
    ]);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = test_router(FakeSource::with_ids(Vec::<u64>::new()), Config::default());

    let response = app.oneshot(get_request("/api/v1/stories/worst")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
