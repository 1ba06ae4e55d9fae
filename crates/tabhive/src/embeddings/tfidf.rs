//! Batch-fitted TF-IDF vectors with a domain-signal tail.
//!
//! The vocabulary is whatever the batch actually contains, so two batches
//! produce vectors of different dimension. Vectors from one fit are only
//! ever compared with each other.

use std::collections::{HashMap, HashSet};

use super::{l2_normalize, FeatureExtractor, FeatureVector};
use crate::processing::tokenize;

/// Coarse site categories appended as binary flags after the TF-IDF block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainSignal {
    Academic,
    Commerce,
    Video,
    CodeHosting,
}

impl DomainSignal {
    pub const ALL: [DomainSignal; 4] = [
        DomainSignal::Academic,
        DomainSignal::Commerce,
        DomainSignal::Video,
        DomainSignal::CodeHosting,
    ];

    fn markers(&self) -> &'static [&'static str] {
        match self {
            DomainSignal::Academic => &[
                "edu", "scholar", "arxiv", "researchgate", "academia", "jstor", "ieee",
                "springer", "sciencedirect", "learn", "piazza", "lecture", "syllabus", "course",
            ],
            DomainSignal::Commerce => &[
                "amazon", "ebay", "etsy", "walmart", "bestbuy", "target", "shop", "store",
                "cart", "checkout", "aliexpress",
            ],
            DomainSignal::Video => &[
                "youtube", "youtu", "netflix", "twitch", "vimeo", "video", "watch", "hulu",
                "disneyplus",
            ],
            DomainSignal::CodeHosting => &[
                "github", "gitlab", "bitbucket", "stackoverflow", "codeberg", "pull", "repo",
                "commit",
            ],
        }
    }

    /// Whether any token marks this category.
    pub fn detect(&self, tokens: &[String]) -> bool {
        let markers = self.markers();
        tokens.iter().any(|t| markers.contains(&t.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct TfIdf {
    index: HashMap<String, usize>,
    idf: Vec<f32>,
    min_token_len: usize,
    flag_weight: f32,
}

impl TfIdf {
    /// Fit vocabulary and document frequencies on `texts`.
    ///
    /// Terms are indexed in first-occurrence order so the layout is stable
    /// for a given batch.
    pub fn fit(texts: &[&str], min_token_len: usize, flag_weight: f32) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for text in texts {
            let mut seen = HashSet::new();
            for token in tokenize(text, min_token_len) {
                let next = index.len();
                let i = *index.entry(token).or_insert(next);
                if i == doc_freq.len() {
                    doc_freq.push(0);
                }
                if seen.insert(i) {
                    doc_freq[i] += 1;
                }
            }
        }

        let n = texts.len() as f32;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        tracing::debug!(documents = texts.len(), terms = index.len(), "[TfIdf] Fitted batch vocabulary");

        Self {
            index,
            idf,
            min_token_len,
            flag_weight,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }
}

impl FeatureExtractor for TfIdf {
    fn embed(&self, text: &str) -> FeatureVector {
        let tokens = tokenize(text, self.min_token_len);
        let mut vector = vec![0.0f32; self.dimension()];
        if tokens.is_empty() {
            return vector;
        }

        let total = tokens.len() as f32;
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for token in &tokens {
            if let Some(&i) = self.index.get(token) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }
        for (i, count) in counts {
            vector[i] = (count / total) * self.idf[i];
        }

        let terms = self.idf.len();
        l2_normalize(&mut vector[..terms]);

        for (offset, signal) in DomainSignal::ALL.iter().enumerate() {
            if signal.detect(&tokens) {
                vector[terms + offset] = self.flag_weight;
            }
        }
        l2_normalize(&mut vector);
        vector
    }

    fn dimension(&self) -> usize {
        self.idf.len() + DomainSignal::ALL.len()
    }
}
