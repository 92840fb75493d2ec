//! HTTP server for vibe (axum).
//!
//! Listens on `127.0.0.1:8787` by default; see [`app`] for routes.
//!
//! **Public API**: [`build_index`], [`AppState`], [`router`], [`run_serve`],
//! [`run_serve_on_listener`].

mod app;
mod response;

pub use app::{router, AppState};
pub use response::ApiError;

use std::future::Future;
use std::sync::Arc;

use config::ServeSettings;
use tokio::net::TcpListener;
use tracing::{info, warn};
use vibe::{
    normalize_labels, parse_anchor_labels, AnchorIndex, Embedder, HashingEmbedder,
    OpenAIEmbedder, DEFAULT_ANCHORS, DEFAULT_EMBEDDING_MODEL,
};

/// Builds the process's anchor index from settings.
///
/// Uses the OpenAI-compatible embedder when an API key or base URL is configured, otherwise
/// the offline [`HashingEmbedder`]. `VIBE_ANCHORS` replaces the built-in anchor set when it
/// contains at least one label.
pub fn build_index(settings: &ServeSettings) -> AnchorIndex {
    let labels = settings
        .anchors
        .as_deref()
        .map(parse_anchor_labels)
        .filter(|labels| !labels.is_empty())
        .unwrap_or_else(|| normalize_labels(DEFAULT_ANCHORS));

    let embedder: Arc<dyn Embedder> =
        if settings.openai_api_key.is_some() || settings.openai_base_url.is_some() {
            let model = embedding_model(settings);
            info!(model, "using OpenAI-compatible embeddings");
            Arc::new(OpenAIEmbedder::with_endpoint(
                settings.openai_api_key.as_deref(),
                settings.openai_base_url.as_deref(),
                model,
            ))
        } else {
            warn!("OPENAI_API_KEY not set, using offline hashing embedder");
            Arc::new(HashingEmbedder::default())
        };

    info!(count = labels.len(), "anchor labels configured");
    AnchorIndex::new(embedder, labels)
}

/// Configured embeddings model, or [`DEFAULT_EMBEDDING_MODEL`].
pub fn embedding_model(settings: &ServeSettings) -> &str {
    settings
        .embedding_model
        .as_deref()
        .unwrap_or(DEFAULT_EMBEDDING_MODEL)
}

/// Serves on an existing listener until `shutdown` resolves. Used by tests (bind to
/// `127.0.0.1:0`, then pass the listener).
pub async fn run_serve_on_listener<S>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: S,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    S: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("vibe server listening on http://{}", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("vibe server stopped");
    Ok(())
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn run_serve(
    addr: &str,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await
}
