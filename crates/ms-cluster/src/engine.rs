//! Two-level clustering of conversation embeddings.

use std::collections::BTreeMap;

use ms_config::ClusteringConfig;
use ms_core::cluster::{ClusterId, ClusterResult};
use ms_core::vector::mean;

use crate::error::ClusterError;
use crate::hdbscan::Hdbscan;
use crate::keywords::KeywordExtractor;
use crate::ward::meta_cluster;

const SMALL_BATCH: &str = "small-batch";

/// Cluster `texts` by their index-aligned `embeddings`.
///
/// Batches smaller than `small_batch_threshold` become one `small-batch`
/// cluster with id 0. Larger batches run HDBSCAN for leaf clusters, name
/// each leaf from its member keywords, and group leaf centroids into
/// `process-{meta}` families by Ward agglomeration.
///
/// # Errors
///
/// Returns [`ClusterError::LengthMismatch`] when the two inputs differ in
/// length and [`ClusterError::DimensionMismatch`] when embeddings differ in
/// dimensionality.
pub fn cluster_embeddings(
    texts: &[String],
    embeddings: &[Vec<f32>],
    config: &ClusteringConfig,
) -> Result<ClusterResult, ClusterError> {
    if texts.len() != embeddings.len() {
        return Err(ClusterError::LengthMismatch {
            texts: texts.len(),
            embeddings: embeddings.len(),
        });
    }
    check_dimensions(embeddings)?;

    if embeddings.len() < config.small_batch_threshold {
        tracing::debug!(items = embeddings.len(), "small batch, skipping clustering");
        return Ok(small_batch(embeddings.len()));
    }

    let labels = Hdbscan::new(config.min_cluster_size).fit(embeddings);
    let result = name_clusters(
        texts,
        embeddings,
        labels,
        KeywordExtractor::new(config.keywords_per_cluster, config.max_features),
    );
    tracing::debug!(
        clusters = result.level2_map.len(),
        outliers = result.outlier_count(),
        "leaf clustering complete"
    );
    Ok(result)
}

fn small_batch(len: usize) -> ClusterResult {
    ClusterResult::new(
        vec![0; len],
        BTreeMap::from([(0, format!("process-0:{SMALL_BATCH}"))]),
        BTreeMap::from([(0, SMALL_BATCH.to_string())]),
    )
}

fn name_clusters(
    texts: &[String],
    embeddings: &[Vec<f32>],
    labels: Vec<ClusterId>,
    extractor: KeywordExtractor,
) -> ClusterResult {
    let mut result = ClusterResult::new(labels, BTreeMap::new(), BTreeMap::new());
    let ids = result.cluster_ids();

    let mut centroids = Vec::with_capacity(ids.len());
    let mut topics = Vec::with_capacity(ids.len());
    for &id in &ids {
        let members: Vec<usize> = result
            .labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == id)
            .map(|(i, _)| i)
            .collect();

        let member_texts: Vec<&str> = members.iter().map(|&i| texts[i].as_str()).collect();
        let keywords = extractor.extract(&member_texts);
        let level2 = if keywords.is_empty() {
            format!("cluster-{id}")
        } else {
            keywords.join("-")
        };
        result.level2_map.insert(id, level2);
        topics.push(if keywords.is_empty() {
            "general".to_string()
        } else {
            keywords.join(" ")
        });

        let vectors: Vec<&[f32]> = members.iter().map(|&i| embeddings[i].as_slice()).collect();
        centroids.push(mean(&vectors));
    }

    for ((id, meta), topic) in ids.iter().zip(meta_cluster(&centroids)).zip(topics) {
        result.level1_map.insert(*id, format!("process-{meta}:{topic}"));
    }
    result
}

fn check_dimensions(embeddings: &[Vec<f32>]) -> Result<(), ClusterError> {
    let Some(expected) = embeddings.first().map(Vec::len) else {
        return Ok(());
    };
    match embeddings.iter().position(|v| v.len() != expected) {
        Some(index) => Err(ClusterError::DimensionMismatch {
            index,
            expected,
            actual: embeddings[index].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_core::cluster::OUTLIER;
    use pretty_assertions::assert_eq;

    fn strings(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn small_batch_gets_fallback_cluster() {
        let texts = strings(&["a", "b", "c", "d"]);
        let embeddings = vec![vec![0.0, 1.0]; 4];
        let result = cluster_embeddings(&texts, &embeddings, &ClusteringConfig::default()).unwrap();
        assert_eq!(result.labels, vec![0; 4]);
        assert_eq!(result.level2(0), "small-batch");
        assert_eq!(result.level1(0), "process-0:small-batch");
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = cluster_embeddings(&strings(&["a"]), &[], &ClusteringConfig::default()).unwrap_err();
        assert!(matches!(err, ClusterError::LengthMismatch { texts: 1, embeddings: 0 }));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let texts = strings(&["a", "b", "c", "d", "e"]);
        let mut embeddings = vec![vec![0.0; 3]; 5];
        embeddings[3] = vec![0.0; 2];
        let err = cluster_embeddings(&texts, &embeddings, &ClusteringConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::DimensionMismatch { index: 3, expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn clusters_without_keywords_use_generic_names() {
        let texts = strings(&["the", "a", "of", "and", "to", "it"]);
        let embeddings = vec![vec![1.0, 0.0]; 6];
        let labels = vec![0, 0, 0, 1, 1, OUTLIER];
        let result = name_clusters(&texts, &embeddings, labels, KeywordExtractor::default());
        assert_eq!(result.level2(0), "cluster-0");
        assert_eq!(result.level1(1), "process-0:general");
    }

    #[test]
    fn names_use_member_keywords() {
        let texts = strings(&[
            "invoice payment overdue",
            "invoice payment late",
            "quote cleaning office",
            "quote cleaning windows",
            "random",
        ]);
        let embeddings = vec![vec![1.0, 0.0]; 5];
        let labels = vec![0, 0, 1, 1, OUTLIER];
        let result = name_clusters(&texts, &embeddings, labels, KeywordExtractor::new(2, 1000));
        assert_eq!(result.level2(0), "invoice-payment");
        assert_eq!(result.level2(1), "cleaning-quote");
        assert_eq!(result.level1(0), "process-0:invoice payment");
        assert_eq!(result.level1(1), "process-0:cleaning quote");
        assert_eq!(result.level2(OUTLIER), "needs_review");
    }
}
