use super::common::{self, CountingEmbedder};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use vibe::CacheState;

#[tokio::test]
async fn e2e_vibe_ranks_matching_anchor_first() {
    let embedder = Arc::new(CountingEmbedder::new(0));
    let server = common::spawn_server(embedder.clone()).await;

    let (status, body) =
        common::post_json(&server.url("/api/vibe"), json!({"term": "nostalgic"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["term"], "nostalgic");
    let scores = body["scores"].as_array().unwrap();
    assert_eq!(scores.len(), common::LABELS.len());
    assert_eq!(scores[0]["label"], "nostalgic");
    assert_eq!(scores[0]["percent"], 100);

    // anchors batch + one term embedding
    assert_eq!(embedder.calls(), 2);
    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn e2e_concurrent_vibes_share_one_anchor_batch() {
    let gate = Arc::new(Semaphore::new(0));
    let embedder = Arc::new(CountingEmbedder::gated(gate.clone()));
    let server = common::spawn_server(embedder.clone()).await;

    let terms = ["rainy day", "bonfire", "arcade", "old photos", "thunder"];
    let requests: Vec<_> = terms
        .iter()
        .map(|&term| {
            let url = server.url("/api/vibe");
            tokio::spawn(async move { common::post_json(&url, json!({ "term": term })).await })
        })
        .collect();

    // Hold the anchor batch until every request has had time to reach the handler.
    while server.index.state() != CacheState::Pending {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.index.state(), CacheState::Pending);
    gate.add_permits(terms.len());

    for request in requests {
        let (status, body) = request.await.unwrap();
        assert_eq!(status, 200, "body: {}", body);
    }

    assert_eq!(embedder.batches(), 1);
    assert_eq!(embedder.calls(), 1 + terms.len());
    assert_eq!(server.index.state(), CacheState::Populated);
    server.shutdown().await;
}

#[tokio::test]
async fn e2e_blank_term_is_bad_request() {
    let embedder = Arc::new(CountingEmbedder::new(0));
    let server = common::spawn_server(embedder.clone()).await;

    let (status, body) = common::post_json(&server.url("/api/vibe"), json!({"term": "   "})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "term must not be empty");
    assert_eq!(embedder.calls(), 0);

    server.shutdown().await;
}

#[tokio::test]
async fn e2e_upstream_failure_is_bad_gateway() {
    let server = common::spawn_server(Arc::new(CountingEmbedder::new(1))).await;

    let (status, body) = common::post_json(&server.url("/api/vibe"), json!({"term": "cozy"})).await;
    assert_eq!(status, 502);
    assert!(body["error"].is_string());

    server.shutdown().await;
}

#[tokio::test]
async fn e2e_malformed_body_is_json_bad_request() {
    let embedder = Arc::new(CountingEmbedder::new(0));
    let server = common::spawn_server(embedder.clone()).await;

    let resp = reqwest::Client::new()
        .post(server.url("/api/vibe"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].is_string(), "unexpected body: {}", body);

    let (status, body) = common::post_json(&server.url("/api/vibe"), json!({"word": "cozy"})).await;
    assert_eq!(status, 400);
    assert!(
        body["error"].as_str().unwrap().contains("term"),
        "unexpected body: {}",
        body
    );
    assert_eq!(embedder.calls(), 0);

    server.shutdown().await;
}
