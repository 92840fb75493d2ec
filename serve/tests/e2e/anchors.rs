use super::common::{self, CountingEmbedder};
use std::sync::Arc;

#[tokio::test]
async fn e2e_state_does_not_compute() {
    let embedder = Arc::new(CountingEmbedder::new(0));
    let server = common::spawn_server(embedder.clone()).await;

    let (status, body) = common::get_json(&server.url("/api/anchors/state")).await;
    assert_eq!(status, 200);
    assert_eq!(body["state"], "empty");
    assert_eq!(embedder.calls(), 0);

    server.shutdown().await;
}

#[tokio::test]
async fn e2e_anchors_computed_once() {
    let embedder = Arc::new(CountingEmbedder::new(0));
    let server = common::spawn_server(embedder.clone()).await;

    let (status, body) = common::get_json(&server.url("/api/anchors")).await;
    assert_eq!(status, 200);
    assert_eq!(body["labels"], serde_json::json!(common::LABELS));
    assert_eq!(body["dimension"], 32);
    assert_eq!(body["state"], "populated");

    let (status, _) = common::get_json(&server.url("/api/anchors")).await;
    assert_eq!(status, 200);
    assert_eq!(embedder.calls(), 1);

    let (_, body) = common::get_json(&server.url("/api/anchors/state")).await;
    assert_eq!(body["state"], "populated");

    server.shutdown().await;
}

#[tokio::test]
async fn e2e_failed_anchors_retry_on_next_request() {
    let embedder = Arc::new(CountingEmbedder::new(1));
    let server = common::spawn_server(embedder.clone()).await;

    let (status, body) = common::get_json(&server.url("/api/anchors")).await;
    assert_eq!(status, 502);
    assert!(
        body["error"].as_str().unwrap().contains("upstream unavailable"),
        "unexpected body: {}",
        body
    );
    let (_, body) = common::get_json(&server.url("/api/anchors/state")).await;
    assert_eq!(body["state"], "empty");

    let (status, _) = common::get_json(&server.url("/api/anchors")).await;
    assert_eq!(status, 200);
    assert_eq!(embedder.calls(), 2);

    server.shutdown().await;
}
