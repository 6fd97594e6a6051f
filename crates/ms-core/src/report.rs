//! Labeling report written at the end of a pipeline run.

use serde::{Deserialize, Serialize};

use crate::entities::{Conversation, ConversationMetadata};
use crate::intent::IntentLabel;
use crate::taxonomy::TaxonomyLabel;

/// The three taxonomy levels as serialized in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelLevels {
    pub level1: String,
    pub level2: String,
    pub level3: IntentLabel,
}

/// One labeled conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationReport {
    pub conversation_id: String,
    pub subject: String,
    pub labels: LabelLevels,
    pub confidence: f64,
    pub needs_review: bool,
    pub metadata: ConversationMetadata,
}

impl ConversationReport {
    #[must_use]
    pub fn new(conversation: &Conversation, label: &TaxonomyLabel) -> Self {
        Self {
            conversation_id: conversation.conversation_id.clone(),
            subject: conversation.merged_subject.clone(),
            labels: LabelLevels {
                level1: label.level1.clone(),
                level2: label.level2.clone(),
                level3: label.level3,
            },
            confidence: label.confidence,
            needs_review: label.needs_review,
            metadata: conversation.metadata.clone(),
        }
    }
}

/// Counts and quality metrics for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub input_emails: usize,
    pub filtered_out: usize,
    /// Records left after deduplication.
    pub deduped: usize,
    pub conversations: usize,
    /// Distinct non-outlier leaf clusters.
    pub clusters: usize,
    pub outliers: usize,
    pub needs_review: usize,
    pub avg_intra_cluster_similarity: f64,
    pub dunn_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    pub conversations: Vec<ConversationReport>,
}

/// Round to three decimal places, as reported in the summary.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rounds_metrics_to_three_places() {
        assert!((round3(0.123_456) - 0.123).abs() < 1e-12);
        assert!((round3(0.9996) - 1.0).abs() < 1e-12);
        assert!(round3(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn conversation_report_serializes_nested_labels() {
        let conversation = Conversation {
            conversation_id: "c1".into(),
            emails: Vec::new(),
            merged_subject: "request for quote".into(),
            merged_body: "body".into(),
            attachment_names: Vec::new(),
            metadata: ConversationMetadata {
                sender_domain: "example.com".into(),
                thread_length: 1,
                has_attachments: false,
            },
        };
        let label = TaxonomyLabel {
            level1: "process-0:quote".into(),
            level2: "quote".into(),
            level3: IntentLabel::ServiceRequest,
            confidence: 0.7,
            needs_review: false,
        };

        let value = serde_json::to_value(ConversationReport::new(&conversation, &label)).unwrap();
        assert_eq!(value["labels"]["level3"], "service_request");
        assert_eq!(value["labels"]["level1"], "process-0:quote");
        assert_eq!(value["metadata"]["sender_domain"], "example.com");
        assert_eq!(value["needs_review"], false);
    }
}
