//! End-to-end labeling of one export.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use futures::{StreamExt, TryStreamExt, stream};
use ms_cluster::{average_intra_cluster_similarity, cluster_embeddings, dunn_index};
use ms_config::MailsortConfig;
use ms_core::entities::Conversation;
use ms_core::report::{ConversationReport, Report, Summary, round3};
use ms_core::{IntentResult, assign_taxonomy};
use ms_embeddings::{Embedder, EmbeddingProvider, ensure_uniform_dimension};
use ms_ingest::{Cleaner, build_conversations, deduplicate, load_emails};
use ms_intent::{IntentClassifier, IntentError};

/// Load, clean, thread, embed, cluster, classify and label `input`.
pub async fn run_pipeline(input: &Path, config: &MailsortConfig) -> anyhow::Result<Report> {
    let emails = load_emails(input)
        .with_context(|| format!("failed to load emails from {}", input.display()))?;
    let input_emails = emails.len();

    let (kept, removed) = Cleaner::new()?.filter_emails(emails);
    let unique = deduplicate(kept);
    let deduped = unique.len();
    let conversations = build_conversations(unique);
    let texts: Vec<String> = conversations
        .iter()
        .map(Conversation::embedding_text)
        .collect();
    tracing::info!(
        input_emails,
        filtered_out = removed.len(),
        conversations = conversations.len(),
        "prepared conversations"
    );

    let embedder = Arc::new(
        EmbeddingProvider::from_config(config).context("failed to initialize embedder")?,
    );
    let embeddings = embedder
        .embed(&texts)
        .await
        .context("failed to embed conversations")?;
    ensure_uniform_dimension(&embeddings)?;

    let clusters = cluster_embeddings(&texts, &embeddings, &config.clustering)?;

    let classifier = IntentClassifier::from_config(Arc::clone(&embedder), config)?;
    let intents = classify_all(&classifier, &texts, config.embedding.concurrency)
        .await
        .context("failed to classify conversation intent")?;
    let labels = assign_taxonomy(&clusters, &intents)?;

    let summary = Summary {
        input_emails,
        filtered_out: removed.len(),
        deduped,
        conversations: conversations.len(),
        clusters: clusters.cluster_ids().len(),
        outliers: clusters.outlier_count(),
        needs_review: labels.iter().filter(|label| label.needs_review).count(),
        avg_intra_cluster_similarity: round3(average_intra_cluster_similarity(
            &embeddings,
            &clusters.labels,
        )),
        dunn_index: round3(dunn_index(&embeddings, &clusters.labels)),
    };
    tracing::info!(
        clusters = summary.clusters,
        outliers = summary.outliers,
        needs_review = summary.needs_review,
        "labeled conversations"
    );

    Ok(Report {
        summary,
        conversations: conversations
            .iter()
            .zip(&labels)
            .map(|(conversation, label)| ConversationReport::new(conversation, label))
            .collect(),
    })
}

/// Classify every text with at most `concurrency` requests in flight,
/// keeping results in input order.
async fn classify_all<E: Embedder>(
    classifier: &IntentClassifier<E>,
    texts: &[String],
    concurrency: usize,
) -> Result<Vec<IntentResult>, IntentError> {
    stream::iter(texts.iter().map(|text| classifier.classify(text)))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ms_core::IntentLabel;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    /// Defaults resolve to the offline embedder and no external model.
    fn offline_config() -> MailsortConfig {
        MailsortConfig::default()
    }

    fn export() -> serde_json::Value {
        json!([
            {
                "id": "m1",
                "conversation_id": "c1",
                "subject": "Urgent: outage at the main office",
                "body": "This is urgent, the system is down for the whole office.",
                "from": "ops@client.com",
                "date": "2024-03-01T09:00:00Z"
            },
            {
                "id": "m2",
                "conversation_id": "c1",
                "subject": "Re: Urgent: outage at the main office",
                "body": "Any update on the outage? We are still waiting.",
                "from": "ops@client.com",
                "date": "2024-03-01T11:00:00Z"
            },
            {
                "id": "m3",
                "conversation_id": "c2",
                "subject": "Quote request",
                "body": "Please send a quote for the quarterly cleaning service.",
                "from": "buyer@shop.com",
                "attachments": ["floorplan.pdf"]
            },
            {
                "id": "m4",
                "conversation_id": "c3",
                "subject": "Prize",
                "body": "Click here to claim your casino bonus.",
                "from": "spam@spam.biz"
            },
            {
                "id": "m5",
                "conversation_id": "c2",
                "subject": "Quote request",
                "body": "Please send a quote for the quarterly cleaning service.",
                "from": "buyer@shop.com",
                "attachments": ["floorplan.pdf"]
            }
        ])
    }

    #[tokio::test]
    async fn small_export_produces_a_complete_report() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("export.json");
        fs::write(&input, export().to_string()).unwrap();

        let report = run_pipeline(&input, &offline_config()).await.unwrap();

        assert_eq!(report.summary.input_emails, 5);
        assert_eq!(report.summary.filtered_out, 1);
        assert_eq!(report.summary.deduped, 3);
        assert_eq!(report.summary.conversations, 2);
        assert_eq!(report.summary.clusters, 1);
        assert_eq!(report.summary.outliers, 0);
        assert_eq!(report.conversations.len(), 2);

        let outage = &report.conversations[0];
        assert_eq!(outage.conversation_id, "c1");
        assert_eq!(outage.subject, "urgent: outage at the main office");
        assert_eq!(outage.labels.level2, "small-batch");
        assert_eq!(outage.labels.level1, "process-0:small-batch");
        assert_eq!(outage.metadata.thread_length, 2);

        let quote = &report.conversations[1];
        assert!(quote.metadata.has_attachments);
        assert!(quote.confidence >= 0.1);
        assert!(IntentLabel::ALL.contains(&quote.labels.level3));
    }

    #[tokio::test]
    async fn empty_export_yields_empty_report() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty.json");
        fs::write(&input, "[]").unwrap();

        let report = run_pipeline(&input, &offline_config()).await.unwrap();
        assert_eq!(report.summary.conversations, 0);
        assert!(report.conversations.is_empty());
        assert!(report.summary.dunn_index.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_input_names_the_path() {
        let err = run_pipeline(Path::new("/nonexistent/export.json"), &offline_config())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/export.json"));
    }
}
