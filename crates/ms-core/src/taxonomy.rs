//! Taxonomy assignment: cluster membership (level1/level2) fused with intent (level3).

use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterResult, is_outlier};
use crate::errors::CoreError;
use crate::intent::{IntentLabel, IntentResult};

/// Lowest confidence ever reported for a final label.
pub const CONFIDENCE_FLOOR: f64 = 0.1;

/// Final three-level label for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyLabel {
    /// Coarse topic (meta-cluster name).
    pub level1: String,
    /// Fine topic (leaf-cluster name).
    pub level2: String,
    /// Intent.
    pub level3: IntentLabel,
    pub confidence: f64,
    pub needs_review: bool,
}

/// Combine a [`ClusterResult`] with index-aligned intents into final labels.
///
/// Output order and length match the input. An item needs review when it is
/// an outlier or its intent is `requires_review`. Confidence is the intent
/// confidence floored at [`CONFIDENCE_FLOOR`]; cluster membership does not
/// otherwise affect it.
///
/// # Errors
///
/// Returns [`CoreError::LengthMismatch`] if `intents` is not index-aligned
/// with `clusters.labels`.
pub fn assign_taxonomy(
    clusters: &ClusterResult,
    intents: &[IntentResult],
) -> Result<Vec<TaxonomyLabel>, CoreError> {
    if clusters.len() != intents.len() {
        return Err(CoreError::LengthMismatch {
            expected: clusters.len(),
            actual: intents.len(),
        });
    }

    Ok(clusters
        .labels
        .iter()
        .zip(intents)
        .map(|(&cluster_id, intent)| TaxonomyLabel {
            level1: clusters.level1(cluster_id).to_string(),
            level2: clusters.level2(cluster_id).to_string(),
            level3: intent.label,
            confidence: intent.confidence.max(CONFIDENCE_FLOOR),
            needs_review: is_outlier(cluster_id) || intent.label.requires_review(),
        })
        .collect())
}
