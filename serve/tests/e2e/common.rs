//! Shared helpers for e2e tests. Received bodies are logged with `[e2e] received: ...`;
//! run with `--nocapture` to see them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serve::AppState;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Semaphore};
use vibe::{AnchorIndex, EmbedError, Embedder, HashingEmbedder};

pub const LABELS: &[&str] = &["cozy", "chaotic", "nostalgic"];

/// A running server. Dropping it without [`shutdown`](Self::shutdown) leaves the task to
/// the runtime.
pub struct TestServer {
    pub base_url: String,
    pub index: Arc<AnchorIndex>,
    stop: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

/// Offline embedder that counts calls and can fail the first `failures` calls. With a gate,
/// anchor batches (calls with more than one text) wait for a permit.
pub struct CountingEmbedder {
    inner: HashingEmbedder,
    calls: AtomicUsize,
    batches: AtomicUsize,
    failures: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl CountingEmbedder {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: HashingEmbedder::new(32),
            calls: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
            failures: AtomicUsize::new(failures),
            gate: None,
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(0)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if texts.len() > 1 {
            self.batches.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _permit = gate
                    .acquire()
                    .await
                    .map_err(|e| EmbedError::Api(e.to_string()))?;
            }
        }
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(EmbedError::Api("upstream unavailable".to_string()));
        }
        self.inner.embed(texts).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

/// Binds a random port and serves `embedder` over [`LABELS`].
pub async fn spawn_server(embedder: Arc<dyn Embedder>) -> TestServer {
    let labels = LABELS.iter().map(|s| s.to_string()).collect();
    let index = Arc::new(AnchorIndex::new(embedder, labels));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let state = Arc::new(AppState::new(Arc::clone(&index)));
    let handle = tokio::spawn(serve::run_serve_on_listener(listener, state, async {
        let _ = stopped.await;
    }));

    TestServer {
        base_url: format!("http://{}", addr),
        index,
        stop: Some(stop),
        handle,
    }
}

/// Returns the status and parsed JSON body.
pub async fn get_json(url: &str) -> (u16, serde_json::Value) {
    let resp = reqwest::get(url).await.unwrap();
    read_json(resp).await
}

pub async fn post_json(url: &str, body: serde_json::Value) -> (u16, serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap();
    read_json(resp).await
}

async fn read_json(resp: reqwest::Response) -> (u16, serde_json::Value) {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap();
    eprintln!("[e2e] received: {}", text);
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    (status, body)
}
