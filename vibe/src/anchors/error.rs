//! Anchor-related errors.

use thiserror::Error;

use crate::embedder::EmbedError;

/// Errors from building, resolving or scoring against anchor embeddings.
///
/// `Clone` because one failed anchor computation is reported to every caller that was
/// waiting on it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnchorError {
    #[error("no anchor labels configured")]
    NoAnchors,
    #[error("term must not be empty")]
    EmptyTerm,
    #[error("duplicate anchor label: {0}")]
    DuplicateLabel(String),
    #[error(transparent)]
    Embedding(#[from] EmbedError),
    #[error("expected {expected} anchor vectors, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("anchor {label:?} has an empty vector")]
    EmptyVector { label: String },
    #[error("vector for {label:?} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },
}
