use super::common;
use std::sync::Arc;
use vibe::HashingEmbedder;

#[tokio::test]
async fn e2e_health() {
    let server = common::spawn_server(Arc::new(HashingEmbedder::new(32))).await;

    let (status, body) = common::get_json(&server.url("/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({"status": "ok"}));

    server.shutdown().await;
}
