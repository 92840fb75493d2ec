//! Anchor embeddings: the expensive, process-lifetime mapping from anchor label to vector.
//!
//! [`AnchorIndex`] resolves the mapping once through a [`MemoCell`](crate::cache::MemoCell)
//! and scores terms against it. [`AnchorEmbeddings`] is the immutable value it caches.

mod error;
mod index;
mod labels;

pub use error::AnchorError;
pub use index::{AnchorIndex, VibeProfile};
pub use labels::{normalize_labels, parse_anchor_labels, DEFAULT_ANCHORS};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable mapping from anchor label to a vector; every vector has length [`dimension`](Self::dimension).
///
/// Cloning is cheap (shared `Arc`), so every caller of the cache gets its own handle to
/// the same data.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorEmbeddings {
    labels: Arc<[String]>,
    vectors: Arc<HashMap<String, Vec<f32>>>,
    dimension: usize,
}

impl AnchorEmbeddings {
    /// Pairs `labels[i]` with `vectors[i]`.
    ///
    /// Fails when there are no labels, counts differ, a label repeats, or vectors are empty
    /// or of differing length.
    pub fn from_vectors(labels: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self, AnchorError> {
        if labels.is_empty() {
            return Err(AnchorError::NoAnchors);
        }
        if labels.len() != vectors.len() {
            return Err(AnchorError::CountMismatch {
                expected: labels.len(),
                actual: vectors.len(),
            });
        }
        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(AnchorError::EmptyVector {
                label: labels[0].clone(),
            });
        }

        let mut seen = HashSet::with_capacity(labels.len());
        let mut map = HashMap::with_capacity(labels.len());
        for (label, vector) in labels.iter().zip(vectors) {
            if !seen.insert(label.as_str()) {
                return Err(AnchorError::DuplicateLabel(label.clone()));
            }
            if vector.len() != dimension {
                return Err(AnchorError::DimensionMismatch {
                    label: label.clone(),
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            map.insert(label.clone(), vector);
        }

        Ok(Self {
            labels: labels.into(),
            vectors: Arc::new(map),
            dimension,
        })
    }

    /// Labels in the order they were configured.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, label: &str) -> Option<&[f32]> {
        self.vectors.get(label).map(Vec::as_slice)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, vector)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> + '_ {
        self.labels
            .iter()
            .filter_map(|l| self.get(l).map(|v| (l.as_str(), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builds_and_preserves_label_order() {
        let a = AnchorEmbeddings::from_vectors(
            labels(&["cozy", "edgy"]),
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.dimension(), 2);
        assert_eq!(a.labels(), &["cozy".to_string(), "edgy".to_string()]);
        assert_eq!(a.get("edgy"), Some(&[0.0, 1.0][..]));
        let order: Vec<&str> = a.iter().map(|(l, _)| l).collect();
        assert_eq!(order, vec!["cozy", "edgy"]);
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            AnchorEmbeddings::from_vectors(vec![], vec![]).unwrap_err(),
            AnchorError::NoAnchors
        );
        assert_eq!(
            AnchorEmbeddings::from_vectors(labels(&["a", "b"]), vec![vec![1.0]]).unwrap_err(),
            AnchorError::CountMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            AnchorEmbeddings::from_vectors(labels(&["a"]), vec![vec![]]).unwrap_err(),
            AnchorError::EmptyVector {
                label: "a".to_string()
            }
        );
        assert_eq!(
            AnchorEmbeddings::from_vectors(labels(&["a", "a"]), vec![vec![1.0], vec![2.0]])
                .unwrap_err(),
            AnchorError::DuplicateLabel("a".to_string())
        );
        assert_eq!(
            AnchorEmbeddings::from_vectors(labels(&["a", "b"]), vec![vec![1.0], vec![1.0, 2.0]])
                .unwrap_err(),
            AnchorError::DimensionMismatch {
                label: "b".to_string(),
                expected: 1,
                actual: 2
            }
        );
    }
}
