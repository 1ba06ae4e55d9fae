use super::{l2_normalize, FeatureExtractor, FeatureVector};
use crate::processing::tokenize;

const ALPHABET: usize = 26;

/// Cheap 26-dimensional letter-frequency fallback.
///
/// Counts each ASCII letter over the surviving tokens, divides by the total
/// token length, then L2-normalizes.
#[derive(Debug, Clone)]
pub struct LetterFrequency {
    min_token_len: usize,
}

impl LetterFrequency {
    pub fn new(min_token_len: usize) -> Self {
        Self { min_token_len }
    }
}

impl Default for LetterFrequency {
    fn default() -> Self {
        Self::new(3)
    }
}

impl FeatureExtractor for LetterFrequency {
    fn embed(&self, text: &str) -> FeatureVector {
        let mut vector = vec![0.0f32; ALPHABET];
        let tokens = tokenize(text, self.min_token_len);
        let total: usize = tokens.iter().map(|t| t.chars().count()).sum();
        if total == 0 {
            return vector;
        }

        for c in tokens.iter().flat_map(|t| t.chars()) {
            if c.is_ascii_lowercase() {
                vector[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        vector.iter_mut().for_each(|x| *x /= total as f32);
        l2_normalize(&mut vector);
        vector
    }

    fn dimension(&self) -> usize {
        ALPHABET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{cosine_similarity, l2_norm};

    #[test]
    fn test_dimension_and_unit_length() {
        let extractor = LetterFrequency::default();
        let v = extractor.embed("Linear algebra notes");
        assert_eq!(v.len(), 26);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stopword_text_is_zero() {
        let extractor = LetterFrequency::default();
        let v = extractor.embed("the and of");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_anagrams_are_identical() {
        let extractor = LetterFrequency::default();
        let a = extractor.embed("listen");
        let b = extractor.embed("silent");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }
}
