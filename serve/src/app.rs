//! Axum app: shared state and routes.
//!
//! - `GET /health`
//! - `GET /api/anchors`: resolves anchor embeddings (computing them on first use)
//! - `GET /api/anchors/state`: cache state, never computes
//! - `POST /api/vibe` `{"term": "..."}`: scores the term against every anchor

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use vibe::{AnchorIndex, CacheState, VibeProfile};

use crate::response::ApiError;

/// Shared state for every handler.
///
/// Holds the process's single [`AnchorIndex`]; build it once at startup and pass it in
/// rather than reaching for a global.
pub struct AppState {
    pub anchors: Arc<AnchorIndex>,
}

impl AppState {
    pub fn new(anchors: Arc<AnchorIndex>) -> Self {
        Self { anchors }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct AnchorsResponse {
    labels: Vec<String>,
    dimension: usize,
    state: CacheState,
}

#[derive(Debug, Serialize)]
struct AnchorStateResponse {
    state: CacheState,
}

#[derive(Debug, Deserialize)]
struct VibeRequest {
    term: String,
}

/// Builds the router with all routes bound to `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/anchors", get(anchors))
        .route("/api/anchors/state", get(anchor_state))
        .route("/api/vibe", post(score_vibe))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn anchors(State(state): State<Arc<AppState>>) -> Result<Json<AnchorsResponse>, ApiError> {
    let embeddings = state.anchors.embeddings().await?;
    Ok(Json(AnchorsResponse {
        labels: embeddings.labels().to_vec(),
        dimension: embeddings.dimension(),
        state: state.anchors.state(),
    }))
}

async fn anchor_state(State(state): State<Arc<AppState>>) -> Json<AnchorStateResponse> {
    Json(AnchorStateResponse {
        state: state.anchors.state(),
    })
}

async fn score_vibe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VibeRequest>, JsonRejection>,
) -> Result<Json<VibeProfile>, ApiError> {
    let Json(req) = payload?;
    let profile = state.anchors.score(&req.term).await?;
    Ok(Json(profile))
}
