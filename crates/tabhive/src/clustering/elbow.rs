//! Elbow selection over an inertia curve.

/// Pick k from `(k, inertia)` points sorted by ascending k.
///
/// The elbow is the k in `[min_k, last k)` with the largest discrete second
/// derivative `I[k-1] - 2 I[k] + I[k+1]`. With too few points for that, the k
/// with the single largest drop `I[k-1] - I[k]` is used. Ties favor the
/// smaller k.
pub fn elbow_k(curve: &[(usize, f32)], min_k: usize) -> usize {
    let mut best: Option<(usize, f32)> = None;
    for window in curve.windows(3) {
        let (k, current) = window[1];
        if k < min_k {
            continue;
        }
        let curvature = window[0].1 - 2.0 * current + window[2].1;
        if best.map_or(true, |(_, b)| curvature > b) {
            best = Some((k, curvature));
        }
    }
    if let Some((k, _)) = best {
        return k;
    }

    let mut best_drop: Option<(usize, f32)> = None;
    for pair in curve.windows(2) {
        let (k, current) = pair[1];
        if k < min_k {
            continue;
        }
        let drop = pair[0].1 - current;
        if best_drop.map_or(true, |(_, b)| drop > b) {
            best_drop = Some((k, drop));
        }
    }
    best_drop
        .map(|(k, _)| k)
        .or_else(|| curve.first().map(|(k, _)| *k))
        .unwrap_or(min_k)
}
