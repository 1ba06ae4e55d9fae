use std::collections::HashMap;

use super::{l2_normalize, FeatureExtractor, FeatureVector};
use crate::processing::tokenize;

/// General academic words every fixed vocabulary starts with.
pub const ACADEMIC_WORDS: &[&str] = &[
    "study", "research", "theory", "analysis", "concept", "data", "method", "result",
    "process", "system", "function", "structure", "model", "factor", "value", "effect",
    "role", "form", "level", "case", "group", "number", "example", "point", "state",
    "problem", "issue", "approach", "development",
];

/// Bag-of-words over a vocabulary fixed at construction.
///
/// Used by the subject classifier so that category embeddings and tab
/// embeddings always share the same dimensions.
#[derive(Debug, Clone)]
pub struct FixedVocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    min_token_len: usize,
}

impl FixedVocabulary {
    /// Vocabulary from arbitrary phrases; each phrase is tokenized the same
    /// way input text is, duplicates keep their first position.
    pub fn new<I, S>(phrases: I, min_token_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms = Vec::new();
        let mut index = HashMap::new();
        for phrase in phrases {
            for token in tokenize(phrase.as_ref(), min_token_len) {
                if !index.contains_key(&token) {
                    index.insert(token.clone(), terms.len());
                    terms.push(token);
                }
            }
        }
        Self {
            terms,
            index,
            min_token_len,
        }
    }

    /// The academic base words followed by `extra` phrases.
    pub fn academic_with<I, S>(extra: I, min_token_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = ACADEMIC_WORDS.iter().map(|w| w.to_string());
        let extra = extra.into_iter().map(|s| s.as_ref().to_string());
        Self::new(base.chain(extra), min_token_len)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl FeatureExtractor for FixedVocabulary {
    fn embed(&self, text: &str) -> FeatureVector {
        let mut vector = vec![0.0f32; self.terms.len()];
        for token in tokenize(text, self.min_token_len) {
            if let Some(&i) = self.index.get(&token) {
                vector[i] += 1.0;
            }
        }
        l2_normalize(&mut vector);
        vector
    }

    fn dimension(&self) -> usize {
        self.terms.len()
    }
}
