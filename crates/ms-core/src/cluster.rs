//! Cluster assignment produced by one clustering run.
//!
//! Leaf cluster ids are small non-negative integers that are only meaningful
//! within a single run. Items outside every dense region carry [`OUTLIER`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Identifier of a leaf cluster within one run.
pub type ClusterId = i32;

/// Sentinel id for items that do not belong to any leaf cluster.
pub const OUTLIER: ClusterId = -1;

/// Name reported for outliers and for ids absent from the name maps.
pub const OUTLIER_LABEL: &str = "needs_review";

/// Per-item leaf cluster ids plus the level1/level2 names of every leaf cluster.
///
/// `labels` is index-aligned with the conversations that were clustered. Every
/// non-outlier id in `labels` has an entry in both maps; the outlier label is
/// never stored as a map entry but returned by [`Self::level1`] and
/// [`Self::level2`] for unmapped ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub labels: Vec<ClusterId>,
    pub level1_map: BTreeMap<ClusterId, String>,
    pub level2_map: BTreeMap<ClusterId, String>,
    pub outlier_label: String,
}

impl ClusterResult {
    /// Build a result using the default [`OUTLIER_LABEL`].
    #[must_use]
    pub fn new(
        labels: Vec<ClusterId>,
        level1_map: BTreeMap<ClusterId, String>,
        level2_map: BTreeMap<ClusterId, String>,
    ) -> Self {
        Self {
            labels,
            level1_map,
            level2_map,
            outlier_label: OUTLIER_LABEL.to_string(),
        }
    }

    /// Number of clustered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Coarse (meta-cluster) name for `id`, or the outlier label.
    #[must_use]
    pub fn level1(&self, id: ClusterId) -> &str {
        self.level1_map
            .get(&id)
            .map_or(self.outlier_label.as_str(), String::as_str)
    }

    /// Fine (leaf-cluster) name for `id`, or the outlier label.
    #[must_use]
    pub fn level2(&self, id: ClusterId) -> &str {
        self.level2_map
            .get(&id)
            .map_or(self.outlier_label.as_str(), String::as_str)
    }

    /// Distinct non-outlier ids appearing in `labels`, ascending.
    #[must_use]
    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        self.labels
            .iter()
            .copied()
            .filter(|&id| !is_outlier(id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of items assigned the outlier sentinel.
    #[must_use]
    pub fn outlier_count(&self) -> usize {
        self.labels.iter().filter(|&&id| is_outlier(id)).count()
    }
}

/// Whether `id` is the outlier sentinel.
#[must_use]
pub const fn is_outlier(id: ClusterId) -> bool {
    id == OUTLIER
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ClusterResult {
        ClusterResult::new(
            vec![0, 1, OUTLIER, 0, 1],
            BTreeMap::from([
                (0, "process-0:invoice payment".to_string()),
                (1, "process-1:quote cleaning".to_string()),
            ]),
            BTreeMap::from([
                (0, "invoice-payment".to_string()),
                (1, "quote-cleaning".to_string()),
            ]),
        )
    }

    #[test]
    fn lookups_fall_back_to_outlier_label() {
        let result = sample();
        assert_eq!(result.level2(0), "invoice-payment");
        assert_eq!(result.level1(1), "process-1:quote cleaning");
        assert_eq!(result.level1(OUTLIER), OUTLIER_LABEL);
        assert_eq!(result.level2(42), OUTLIER_LABEL);
    }

    #[test]
    fn outlier_label_is_never_a_map_entry() {
        let result = sample();
        assert!(!result.level1_map.contains_key(&OUTLIER));
        assert!(!result.level2_map.contains_key(&OUTLIER));
    }

    #[test]
    fn cluster_ids_are_distinct_and_sorted() {
        let result = sample();
        assert_eq!(result.cluster_ids(), vec![0, 1]);
        assert_eq!(result.outlier_count(), 1);
        assert_eq!(result.len(), 5);
    }
}
