//! Leaf and meta clustering parameters.

use serde::{Deserialize, Serialize};

const fn default_min_cluster_size() -> usize {
    5
}

const fn default_small_batch_threshold() -> usize {
    5
}

const fn default_keywords_per_cluster() -> usize {
    4
}

const fn default_max_features() -> usize {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusteringConfig {
    /// Minimum members of a dense leaf cluster (also the core-distance neighbor count).
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,

    /// Batches smaller than this are labeled as one `small-batch` cluster.
    #[serde(default = "default_small_batch_threshold")]
    pub small_batch_threshold: usize,

    /// Keywords used to name each leaf cluster.
    #[serde(default = "default_keywords_per_cluster")]
    pub keywords_per_cluster: usize,

    /// Vocabulary cap for keyword extraction.
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: default_min_cluster_size(),
            small_batch_threshold: default_small_batch_threshold(),
            keywords_per_cluster: default_keywords_per_cluster(),
            max_features: default_max_features(),
        }
    }
}
