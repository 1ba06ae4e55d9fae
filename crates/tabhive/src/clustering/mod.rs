//! Clustering engine: automatic k selection and best-of-seeds k-means.
//!
//! Every run is seeded from configuration, so identical input always yields
//! an identical partition.

pub mod elbow;
pub mod kmeans;

use rayon::prelude::*;

use crate::config::ClusteringConfig;
use crate::embeddings::{cosine_similarity, FeatureVector};

pub use elbow::elbow_k;
pub use kmeans::KMeansRun;

#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: usize,
    pub centroid: FeatureVector,
    /// Indices into the clustered vectors, ascending.
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clustering {
    pub clusters: Vec<Cluster>,
    pub inertia: f32,
}

#[derive(Debug, Clone)]
pub struct ClusteringEngine {
    config: ClusteringConfig,
}

impl ClusteringEngine {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Pick a cluster count for `vectors` by the elbow method.
    pub fn choose_k(&self, vectors: &[FeatureVector], min_k: usize, max_k: usize) -> usize {
        let n = vectors.len();
        if n <= min_k * 2 {
            return min_k.min(n / 2);
        }

        let lo = min_k.saturating_sub(1).max(1);
        let hi = max_k.min(n - 1);
        if hi <= lo {
            return hi.max(1);
        }

        let curve: Vec<(usize, f32)> = (lo..=hi)
            .into_par_iter()
            .map(|k| (k, self.best_run(vectors, k).inertia))
            .collect();
        let k = elbow_k(&curve, min_k);

        tracing::debug!(points = n, min_k, max_k = hi, chosen = k, "[Clustering] Elbow selected k");
        k
    }

    /// k-means with `k` clamped to what the input supports.
    ///
    /// Runs once per configured seed and keeps the lowest-inertia run.
    pub fn cluster(&self, vectors: &[FeatureVector], k: usize) -> Clustering {
        let n = vectors.len();
        if n == 0 {
            return Clustering::default();
        }
        let k = if n <= 2 { 1 } else { k.clamp(2, n - 1) };

        let best = self.best_run(vectors, k);
        let iterations = best.iterations;
        let mut clusters: Vec<Cluster> = best
            .centroids
            .into_iter()
            .enumerate()
            .map(|(id, centroid)| Cluster {
                id,
                centroid,
                members: Vec::new(),
            })
            .collect();
        for (i, &c) in best.assignments.iter().enumerate() {
            clusters[c].members.push(i);
        }
        clusters.retain(|c| !c.is_empty());

        tracing::debug!(
            points = n,
            k,
            clusters = clusters.len(),
            iterations,
            inertia = best.inertia,
            "[Clustering] k-means done"
        );

        Clustering {
            clusters,
            inertia: best.inertia,
        }
    }

    fn best_run(&self, vectors: &[FeatureVector], k: usize) -> KMeansRun {
        let runs: Vec<KMeansRun> = self
            .config
            .seeds
            .par_iter()
            .map(|&seed| kmeans::run(vectors, k, seed, self.config.max_iterations))
            .collect();

        // Ties keep the earlier seed so the choice never depends on scheduling.
        let mut best: Option<KMeansRun> = None;
        for run in runs {
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }
        best.unwrap_or_else(|| kmeans::run(vectors, k, 0, self.config.max_iterations))
    }
}

/// Mean cosine similarity over all member pairs; 1.0 for fewer than two members.
pub fn mean_pairwise_similarity(vectors: &[FeatureVector], members: &[usize]) -> f32 {
    if members.len() < 2 {
        return 1.0;
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (a, &i) in members.iter().enumerate() {
        for &j in &members[a + 1..] {
            total += cosine_similarity(&vectors[i], &vectors[j]);
            pairs += 1;
        }
    }
    total / pairs as f32
}
