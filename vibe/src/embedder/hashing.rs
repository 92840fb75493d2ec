//! Deterministic offline embedder based on hashed character trigrams.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::{EmbedError, Embedder};

pub const DEFAULT_HASHING_DIMENSION: usize = 256;

/// Hashes the character trigrams of lower-cased text into `dimension` signed buckets and
/// L2-normalizes the result. Texts sharing spelling share direction, which is enough to
/// run the service without network access.
///
/// Same input gives the same vector for the lifetime of a build. Empty text gives the zero
/// vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// `dimension` is clamped to at least 1.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimension];
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return v;
        }
        let chars: Vec<char> = std::iter::once(' ')
            .chain(normalized.chars())
            .chain(std::iter::once(' '))
            .collect();
        for gram in chars.windows(3) {
            let mut hasher = DefaultHasher::new();
            gram.hash(&mut hasher);
            let h = hasher.finish();
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
