//! [`AnchorIndex`]: memoized anchor embeddings plus term scoring.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AnchorEmbeddings, AnchorError};
use crate::cache::{CacheState, MemoCell};
use crate::embedder::{EmbedError, Embedder};
use crate::similarity::{rank, AnchorScore};

/// A term scored against every anchor, most similar first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VibeProfile {
    pub term: String,
    pub scores: Vec<AnchorScore>,
}

impl VibeProfile {
    /// Closest anchor, if any.
    pub fn top(&self) -> Option<&AnchorScore> {
        self.scores.first()
    }
}

/// Owns the one anchor-embedding cache of the process.
///
/// Build one at startup and share it (`Arc<AnchorIndex>`) with every handler. The first
/// caller of [`embeddings`](Self::embeddings) embeds all labels in one batch; concurrent
/// callers wait on that same batch; later callers get the cached value. A failed batch is
/// not cached and the next call retries.
pub struct AnchorIndex {
    labels: Arc<[String]>,
    embedder: Arc<dyn Embedder>,
    cache: MemoCell<AnchorEmbeddings, AnchorError>,
}

impl AnchorIndex {
    /// Labels are used as given; normalize them with
    /// [`normalize_labels`](super::normalize_labels) first if they come from user config.
    pub fn new(embedder: Arc<dyn Embedder>, labels: Vec<String>) -> Self {
        Self {
            labels: labels.into(),
            embedder,
            cache: MemoCell::new(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Anchor embeddings, computed on first use.
    pub async fn embeddings(&self) -> Result<AnchorEmbeddings, AnchorError> {
        let embedder = Arc::clone(&self.embedder);
        let labels = Arc::clone(&self.labels);
        self.cache
            .get_or_compute(move || compute_anchor_embeddings(embedder, labels))
            .await
    }

    /// Scores `term` against every anchor.
    pub async fn score(&self, term: &str) -> Result<VibeProfile, AnchorError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AnchorError::EmptyTerm);
        }
        let anchors = self.embeddings().await?;

        let mut vectors = self.embedder.embed(&[term]).await?;
        let term_vector = vectors.pop().ok_or(EmbedError::EmptyResponse)?;
        if term_vector.len() != anchors.dimension() {
            return Err(AnchorError::DimensionMismatch {
                label: term.to_string(),
                expected: anchors.dimension(),
                actual: term_vector.len(),
            });
        }

        let scores = rank(&term_vector, &anchors);
        debug!(term, top = ?scores.first().map(|s| &s.label), "scored term");
        Ok(VibeProfile {
            term: term.to_string(),
            scores,
        })
    }

    pub fn state(&self) -> CacheState {
        self.cache.state()
    }

    /// Cached embeddings, if already computed.
    pub fn cached(&self) -> Option<AnchorEmbeddings> {
        self.cache.get()
    }

    /// Drops the cached embeddings; the next call recomputes them.
    pub fn reset(&self) {
        self.cache.reset();
    }
}

impl std::fmt::Debug for AnchorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorIndex")
            .field("labels", &self.labels)
            .field("state", &self.cache.state())
            .finish()
    }
}

async fn compute_anchor_embeddings(
    embedder: Arc<dyn Embedder>,
    labels: Arc<[String]>,
) -> Result<AnchorEmbeddings, AnchorError> {
    if labels.is_empty() {
        return Err(AnchorError::NoAnchors);
    }
    let started = Instant::now();
    let texts: Vec<&str> = labels.iter().map(String::as_str).collect();
    let vectors = match embedder.embed(&texts).await {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "anchor embedding failed");
            return Err(e.into());
        }
    };
    let anchors = AnchorEmbeddings::from_vectors(labels.to_vec(), vectors)?;
    info!(
        count = anchors.len(),
        dimension = anchors.dimension(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "anchor embeddings computed"
    );
    Ok(anchors)
}
