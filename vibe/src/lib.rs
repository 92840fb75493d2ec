//! # Vibe
//!
//! Core of the vibe service: score a free-form term against a fixed set of semantic
//! "anchors" (cozy, chaotic, nostalgic, ...).
//!
//! Embedding the anchors is the expensive part and its result never changes for the life of
//! the process, so it is memoized in a single-flight [`MemoCell`]: computed at most once,
//! shared by every concurrent caller while in flight, and never cached on failure.
//!
//! ## Main modules
//!
//! - [`cache`]: [`MemoCell`], [`CacheState`].
//! - [`anchors`]: [`AnchorIndex`] (owns the cache), [`AnchorEmbeddings`], [`VibeProfile`].
//! - [`embedder`]: [`Embedder`] trait, [`OpenAIEmbedder`], [`HashingEmbedder`].
//! - [`similarity`]: cosine similarity, [`AnchorScore`], ranking.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vibe::{AnchorIndex, HashingEmbedder, DEFAULT_ANCHORS, normalize_labels};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), vibe::AnchorError> {
//! let index = AnchorIndex::new(
//!     Arc::new(HashingEmbedder::default()),
//!     normalize_labels(DEFAULT_ANCHORS),
//! );
//! let profile = index.score("rainy sunday").await?;
//! println!("{:?}", profile.top());
//! # Ok(())
//! # }
//! ```

pub mod anchors;
pub mod cache;
pub mod embedder;
pub mod similarity;

pub use anchors::{
    normalize_labels, parse_anchor_labels, AnchorEmbeddings, AnchorError, AnchorIndex,
    VibeProfile, DEFAULT_ANCHORS,
};
pub use cache::{CacheState, MemoCell};
pub use embedder::{EmbedError, Embedder, HashingEmbedder, OpenAIEmbedder, DEFAULT_EMBEDDING_MODEL};
pub use similarity::{cosine_similarity, rank, similarity_percent, AnchorScore};
