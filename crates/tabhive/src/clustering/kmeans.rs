//! Single seeded k-means run with k-means++ initialization.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::embeddings::{squared_distance, FeatureVector};

/// Outcome of one seeded run.
#[derive(Debug, Clone)]
pub struct KMeansRun {
    pub assignments: Vec<usize>,
    pub centroids: Vec<FeatureVector>,
    pub inertia: f32,
    pub iterations: usize,
}

/// Run k-means on `vectors` with exactly `k` clusters.
///
/// Callers guarantee `1 <= k <= vectors.len()`.
pub fn run(vectors: &[FeatureVector], k: usize, seed: u64, max_iterations: usize) -> KMeansRun {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut centroids = plus_plus_init(vectors, k, &mut rng);
    let mut assignments = vec![usize::MAX; vectors.len()];
    let mut iterations = 0;

    for _ in 0..max_iterations.max(1) {
        iterations += 1;
        let changed = assign(vectors, &centroids, &mut assignments);
        if !changed {
            break;
        }
        reseed_empty(vectors, &centroids, &mut assignments, k);
        centroids = compute_centroids(vectors, &assignments, k);
    }

    let inertia = inertia(vectors, &centroids, &assignments);
    KMeansRun {
        assignments,
        centroids,
        inertia,
        iterations,
    }
}

/// Sum of squared distances from each point to its assigned centroid.
pub fn inertia(vectors: &[FeatureVector], centroids: &[FeatureVector], assignments: &[usize]) -> f32 {
    vectors
        .iter()
        .zip(assignments)
        .map(|(v, &c)| squared_distance(v, &centroids[c]))
        .sum()
}

/// k-means++: first centroid uniform, each next one drawn with probability
/// proportional to squared distance from the nearest chosen centroid.
fn plus_plus_init(vectors: &[FeatureVector], k: usize, rng: &mut ChaCha8Rng) -> Vec<FeatureVector> {
    let n = vectors.len();
    let mut chosen = vec![rng.gen_range(0..n)];
    let mut min_distances = vec![f32::MAX; n];

    while chosen.len() < k {
        let last = &vectors[chosen[chosen.len() - 1]];
        for (i, v) in vectors.iter().enumerate() {
            let d = squared_distance(v, last);
            if d < min_distances[i] {
                min_distances[i] = d;
            }
        }

        let total: f32 = min_distances.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen::<f32>() * total;
            let mut acc = 0.0;
            let mut pick = None;
            for (i, &d) in min_distances.iter().enumerate() {
                acc += d;
                if d > 0.0 && acc >= target {
                    pick = Some(i);
                    break;
                }
            }
            // Float rounding can leave the cumulative sum just short of target.
            pick.or_else(|| min_distances.iter().rposition(|&d| d > 0.0))
                .unwrap_or(0)
        } else {
            // Every point coincides with a chosen centroid.
            (0..n).find(|i| !chosen.contains(i)).unwrap_or(0)
        };
        chosen.push(next);
    }

    chosen.into_iter().map(|i| vectors[i].clone()).collect()
}

/// Nearest-centroid assignment. A point tied with its current centroid
/// stays put; other ties go to the lower centroid index.
/// Returns whether any assignment changed.
fn assign(vectors: &[FeatureVector], centroids: &[FeatureVector], assignments: &mut [usize]) -> bool {
    let mut changed = false;
    for (i, v) in vectors.iter().enumerate() {
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = squared_distance(v, centroid);
            if d < best_distance {
                best_distance = d;
                best = c;
            }
        }
        let current = assignments[i];
        if current < centroids.len() && squared_distance(v, &centroids[current]) <= best_distance {
            continue;
        }
        if current != best {
            assignments[i] = best;
            changed = true;
        }
    }
    changed
}

/// Give every empty cluster the point farthest from its current centroid,
/// taken from a cluster that can spare one.
fn reseed_empty(vectors: &[FeatureVector], centroids: &[FeatureVector], assignments: &mut [usize], k: usize) {
    let mut counts = vec![0usize; k];
    for &c in assignments.iter() {
        counts[c] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let donor = vectors
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[assignments[*i]] > 1)
            .map(|(i, v)| (i, squared_distance(v, &centroids[assignments[i]])))
            .fold(None, |best: Option<(usize, f32)>, (i, d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((i, d)),
            });
        if let Some((i, _)) = donor {
            counts[assignments[i]] -= 1;
            assignments[i] = empty;
            counts[empty] += 1;
        }
    }
}

fn compute_centroids(vectors: &[FeatureVector], assignments: &[usize], k: usize) -> Vec<FeatureVector> {
    let dim = vectors.first().map_or(0, |v| v.len());
    let mut sums = vec![vec![0.0f32; dim]; k];
    let mut counts = vec![0usize; k];

    for (v, &c) in vectors.iter().zip(assignments) {
        counts[c] += 1;
        for (s, x) in sums[c].iter_mut().zip(v) {
            *s += x;
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(mut sum, count)| {
            if count > 0 {
                sum.iter_mut().for_each(|s| *s /= count as f32);
            }
            sum
        })
        .collect()
}
