//! Cosine similarity and anchor ranking.

use serde::Serialize;

use crate::anchors::AnchorEmbeddings;

/// Cosine similarity of `a` and `b`. Returns 0.0 when lengths differ or either vector is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0)
}

/// Maps a similarity in [-1, 1] to 0..=100 for the progress bar.
pub fn similarity_percent(similarity: f32) -> u8 {
    let p = ((similarity + 1.0) / 2.0 * 100.0).round();
    p.clamp(0.0, 100.0) as u8
}

/// How close a term is to one anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorScore {
    pub label: String,
    pub similarity: f32,
    pub percent: u8,
}

/// Scores `term_vector` against every anchor, most similar first (ties by label).
pub fn rank(term_vector: &[f32], anchors: &AnchorEmbeddings) -> Vec<AnchorScore> {
    let mut scores: Vec<AnchorScore> = anchors
        .iter()
        .map(|(label, vector)| {
            let similarity = cosine_similarity(term_vector, vector);
            AnchorScore {
                label: label.to_string(),
                similarity,
                percent: similarity_percent(similarity),
            }
        })
        .collect();
    scores.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.label.cmp(&b.label))
    });
    scores
}
