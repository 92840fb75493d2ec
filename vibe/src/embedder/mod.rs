//! Embedder trait: turns text into fixed-size float vectors.
//!
//! Implementations: [`OpenAIEmbedder`] (OpenAI-compatible embeddings API) and
//! [`HashingEmbedder`] (deterministic, offline; used when no API key is configured).

mod hashing;
mod openai;

pub use hashing::HashingEmbedder;
pub use openai::{OpenAIEmbedder, DEFAULT_EMBEDDING_MODEL};

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by an [`Embedder`].
///
/// `Clone` so a single failed anchor computation can be handed to every waiting caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbedError {
    /// The embeddings provider returned an error or could not be reached.
    #[error("embedding API error: {0}")]
    Api(String),
    /// The provider answered with no vectors.
    #[error("no embedding returned")]
    EmptyResponse,
    /// The provider returned a different number of vectors than texts sent.
    #[error("expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Produces fixed-size float vectors from text.
///
/// Implementations must be `Send + Sync`: one embedder is shared by the anchor index and
/// every request handler.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds each text into a vector. Returns one vector per input, in input order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Expected vector dimension.
    fn dimension(&self) -> usize;
}
