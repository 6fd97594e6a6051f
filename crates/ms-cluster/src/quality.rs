//! Cluster quality metrics. Outliers are excluded from both.

use std::collections::BTreeMap;

use ms_core::cluster::{ClusterId, is_outlier};
use ms_core::vector::cosine_similarity;

/// Member indices per non-outlier cluster, ascending by id.
fn members(labels: &[ClusterId]) -> BTreeMap<ClusterId, Vec<usize>> {
    let mut groups: BTreeMap<ClusterId, Vec<usize>> = BTreeMap::new();
    for (index, &label) in labels.iter().enumerate() {
        if !is_outlier(label) {
            groups.entry(label).or_default().push(index);
        }
    }
    groups
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - f64::from(cosine_similarity(a, b))
}

/// Mean off-diagonal cosine similarity within each cluster of two or more
/// members, averaged over those clusters.
///
/// Returns `0.0` when no cluster has at least two members.
///
/// # Panics
///
/// Panics if `embeddings` and `labels` differ in length.
#[must_use]
pub fn average_intra_cluster_similarity(embeddings: &[Vec<f32>], labels: &[ClusterId]) -> f64 {
    assert_eq!(embeddings.len(), labels.len(), "one label per embedding");
    let per_cluster: Vec<f64> = members(labels)
        .values()
        .filter(|idx| idx.len() >= 2)
        .map(|idx| {
            let mut total = 0.0;
            for (pos, &i) in idx.iter().enumerate() {
                for &j in &idx[pos + 1..] {
                    total += 2.0 * f64::from(cosine_similarity(&embeddings[i], &embeddings[j]));
                }
            }
            #[allow(clippy::cast_precision_loss)]
            let pairs = (idx.len() * (idx.len() - 1)) as f64;
            total / pairs
        })
        .collect();

    if per_cluster.is_empty() {
        tracing::debug!("no cluster with two or more members");
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = per_cluster.len() as f64;
    per_cluster.iter().sum::<f64>() / count
}

/// Dunn-style separation ratio over cosine distance.
///
/// `min inter-cluster distance / max intra-cluster diameter`. Requires at
/// least two clusters with two or more members; the inter-cluster gap is
/// taken over every pair of non-outlier clusters. Returns `0.0` for a zero
/// diameter or when the precondition does not hold.
///
/// # Panics
///
/// Panics if `embeddings` and `labels` differ in length.
#[must_use]
pub fn dunn_index(embeddings: &[Vec<f32>], labels: &[ClusterId]) -> f64 {
    assert_eq!(embeddings.len(), labels.len(), "one label per embedding");
    let groups = members(labels);
    let qualifying = groups.values().filter(|idx| idx.len() >= 2).count();
    if qualifying < 2 {
        tracing::debug!(qualifying, "too few clusters for separation ratio");
        return 0.0;
    }

    let mut diameter = 0.0_f64;
    for idx in groups.values() {
        for (pos, &i) in idx.iter().enumerate() {
            for &j in &idx[pos + 1..] {
                diameter = diameter.max(cosine_distance(&embeddings[i], &embeddings[j]));
            }
        }
    }

    let clusters: Vec<&Vec<usize>> = groups.values().collect();
    let mut gap = f64::INFINITY;
    for (pos, a) in clusters.iter().enumerate() {
        for b in &clusters[pos + 1..] {
            for &i in a.iter() {
                for &j in b.iter() {
                    gap = gap.min(cosine_distance(&embeddings[i], &embeddings[j]));
                }
            }
        }
    }

    if gap.is_infinite() || diameter == 0.0 {
        return 0.0;
    }
    gap / diameter
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_core::cluster::OUTLIER;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn intra_similarity_of_identical_members_is_one() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]];
        let labels = vec![0, 0, 1, 1];
        assert!(approx(average_intra_cluster_similarity(&embeddings, &labels), 1.0));
    }

    #[test]
    fn intra_similarity_averages_across_clusters() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]];
        // cluster 0 is orthogonal (0.0), cluster 1 identical (1.0)
        let labels = vec![0, 0, 1, 1];
        assert!(approx(average_intra_cluster_similarity(&embeddings, &labels), 0.5));
    }

    #[test]
    fn intra_similarity_without_pairs_is_zero() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        assert_eq!(average_intra_cluster_similarity(&embeddings, &[0, 1, OUTLIER]), 0.0);
        assert_eq!(average_intra_cluster_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn outliers_are_ignored() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(approx(
            average_intra_cluster_similarity(&embeddings, &[0, 0, OUTLIER]),
            1.0
        ));
    }

    #[test]
    fn dunn_with_one_cluster_is_zero() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
        assert_eq!(dunn_index(&embeddings, &[0, 0, OUTLIER]), 0.0);
    }

    #[test]
    fn dunn_with_zero_diameter_is_zero() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]];
        assert_eq!(dunn_index(&embeddings, &[0, 0, 1, 1]), 0.0);
    }

    #[test]
    fn well_separated_clusters_score_above_one() {
        let embeddings = vec![
            vec![1.0, 0.0],
            vec![0.99, 0.05],
            vec![0.0, 1.0],
            vec![0.05, 0.99],
        ];
        assert!(dunn_index(&embeddings, &[0, 0, 1, 1]) > 1.0);
    }

    #[test]
    fn singleton_cluster_counts_toward_gap_only() {
        let embeddings = vec![
            vec![1.0, 0.0],
            vec![0.99, 0.05],
            vec![0.0, 1.0],
            vec![0.05, 0.99],
            vec![0.7, 0.7],
        ];
        let with_singleton = dunn_index(&embeddings, &[0, 0, 1, 1, 2]);
        let without = dunn_index(&embeddings, &[0, 0, 1, 1, OUTLIER]);
        assert!(with_singleton < without);
    }

    #[test]
    #[should_panic(expected = "one label per embedding")]
    fn intra_similarity_rejects_misaligned_labels() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        let _ = average_intra_cluster_similarity(&embeddings, &[0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "one label per embedding")]
    fn dunn_rejects_misaligned_labels() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let _ = dunn_index(&embeddings, &[0, 0]);
    }
}
