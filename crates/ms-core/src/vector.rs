//! Dense vector helpers shared by clustering, quality metrics and intent scoring.

/// Added to norms before dividing so zero vectors stay finite.
pub const NORM_EPSILON: f32 = 1e-8;

#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[must_use]
pub fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Scale `v` to unit length (`v / (‖v‖ + ε)`).
#[must_use]
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let norm = l2_norm(v) + NORM_EPSILON;
    v.iter().map(|x| x / norm).collect()
}

/// Cosine similarity; a zero vector has similarity 0 with everything.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

#[must_use]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Component-wise mean of `vectors`; empty input yields an empty vector.
#[must_use]
pub fn mean(vectors: &[&[f32]]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let mut sum = vec![0.0f32; first.len()];
    for v in vectors {
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let n = vectors.len() as f32;
    sum.iter().map(|x| x / n).collect()
}
