//! Scoring of candidate label partitions.

use crate::clustering::mean_pairwise_similarity;
use crate::embeddings::FeatureVector;

/// Size-weighted mean intra-group cosine similarity, normalized by the
/// total tab count, minus `empty_penalty` when any label group is empty.
///
/// Groups of one tab add nothing: they carry no similarity evidence.
pub fn partition_quality(vectors: &[FeatureVector], groups: &[Vec<usize>], empty_penalty: f32) -> f32 {
    let total = vectors.len().max(1) as f32;
    let cohesion: f32 = groups
        .iter()
        .filter(|g| g.len() >= 2)
        .map(|g| mean_pairwise_similarity(vectors, g) * g.len() as f32)
        .sum::<f32>()
        / total;

    if groups.iter().any(|g| g.is_empty()) {
        cohesion - empty_penalty
    } else {
        cohesion
    }
}
