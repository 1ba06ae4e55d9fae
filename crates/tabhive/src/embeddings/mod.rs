pub mod letters;
pub mod tfidf;
pub mod vocabulary;

pub use letters::LetterFrequency;
pub use tfidf::{DomainSignal, TfIdf};
pub use vocabulary::FixedVocabulary;

/// Fixed-length, L2-normalized weights summarizing one text.
pub type FeatureVector = Vec<f32>;

/// Unified feature extraction trait
pub trait FeatureExtractor: Send + Sync {
    /// Embed one text. Empty or all-stopword text yields the zero vector.
    fn embed(&self, text: &str) -> FeatureVector;

    /// Batch embed, preserving input order
    fn embed_batch(&self, texts: &[&str]) -> Vec<FeatureVector> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Feature vector dimension
    fn dimension(&self) -> usize;
}

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale to unit length in place. The zero vector is left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity in [-1, 1]. Zero vectors and mismatched lengths score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}

#[inline]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_of_zero_vector_is_zero() {
        let zero = vec![0.0; 3];
        let v = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        let a = vec![0.6, 0.8];
        let b = vec![0.8, -0.6];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_lengths_score_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
