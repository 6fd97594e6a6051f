//! Embedding-similarity intent strategy.

use std::sync::Arc;

use ms_core::vector::{dot, normalize};
use ms_core::{IntentLabel, IntentResult};
use ms_embeddings::Embedder;
use tokio::sync::OnceCell;

use crate::error::IntentError;

/// Lowest confidence reported by this strategy.
pub const CONFIDENCE_FLOOR: f64 = 0.5;

/// Highest confidence when the winner is the review fallback.
pub const REVIEW_CEILING: f64 = 0.6;

/// One-line description of each category, embedded as `"{label}: {description}"`.
#[must_use]
pub const fn description(label: IntentLabel) -> &'static str {
    match label {
        IntentLabel::UrgentEscalation => "Urgent request requiring immediate action or escalation.",
        IntentLabel::StatusInquiry => "Request asking for status update or progress.",
        IntentLabel::Complaint => "Complaint, issue report, or service problem.",
        IntentLabel::AdditionalInfo => "Providing additional information or documents.",
        IntentLabel::ServiceRequest => "New service request or quote request.",
        IntentLabel::RequiresReview => "Unclear intent; requires human review.",
    }
}

/// Nearest canonical description by cosine similarity.
///
/// Canonical vectors are embedded on first use and kept for the lifetime of
/// this instance.
pub struct SemanticStrategy<E> {
    embedder: Arc<E>,
    canonical: OnceCell<Vec<Vec<f32>>>,
}

impl<E: Embedder> SemanticStrategy<E> {
    #[must_use]
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            embedder,
            canonical: OnceCell::new(),
        }
    }

    /// # Errors
    ///
    /// Propagates embedder failures; returns [`IntentError::DimensionMismatch`]
    /// when the text vector does not match the canonical vectors.
    pub async fn classify(&self, text: &str) -> Result<IntentResult, IntentError> {
        let canonical = self.canonical().await?;
        let vector = self.embed_one(text).await?;
        score(canonical, &vector)
    }

    async fn canonical(&self) -> Result<&Vec<Vec<f32>>, IntentError> {
        self.canonical
            .get_or_try_init(|| async {
                let texts: Vec<String> = IntentLabel::ALL
                    .iter()
                    .map(|&label| format!("{label}: {}", description(label)))
                    .collect();
                let vectors = self.embedder.embed(&texts).await?;
                if vectors.len() != texts.len() {
                    return Err(IntentError::MissingEmbedding {
                        expected: texts.len(),
                        actual: vectors.len(),
                    });
                }
                tracing::debug!("embedded canonical intent descriptions");
                Ok(vectors.iter().map(|v| normalize(v)).collect())
            })
            .await
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, IntentError> {
        let vectors = self.embedder.embed(&[text.to_string()]).await?;
        match vectors.as_slice() {
            [v] => Ok(normalize(v)),
            other => Err(IntentError::MissingEmbedding {
                expected: 1,
                actual: other.len(),
            }),
        }
    }
}

/// Score a normalized text vector against normalized canonical vectors.
fn score(canonical: &[Vec<f32>], vector: &[f32]) -> Result<IntentResult, IntentError> {
    let mut best: Option<(usize, f32)> = None;
    for (index, reference) in canonical.iter().enumerate() {
        if reference.len() != vector.len() {
            return Err(IntentError::DimensionMismatch {
                expected: reference.len(),
                actual: vector.len(),
            });
        }
        let similarity = dot(reference, vector);
        // First maximum wins.
        if best.is_none_or(|(_, s)| similarity > s) {
            best = Some((index, similarity));
        }
    }
    let (index, similarity) = best.ok_or(IntentError::MissingEmbedding {
        expected: IntentLabel::ALL.len(),
        actual: 0,
    })?;

    let label = IntentLabel::ALL[index];
    let mut confidence = f64::from(similarity).max(CONFIDENCE_FLOOR);
    if label.requires_review() {
        confidence = confidence.min(REVIEW_CEILING);
    }
    Ok(IntentResult::new(label, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_embeddings::{EmbeddingError, OfflineEmbedder};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn axis(i: usize) -> Vec<f32> {
        let mut v = vec![0.0; 6];
        v[i] = 1.0;
        v
    }

    #[test]
    fn picks_most_similar_category() {
        let canonical: Vec<Vec<f32>> = (0..6).map(axis).collect();
        let vector = normalize(&[0.1, 0.0, 0.9, 0.0, 0.0, 0.0]);
        let result = score(&canonical, &vector).unwrap();
        assert_eq!(result.label, IntentLabel::Complaint);
        assert!(result.confidence > 0.9);
    }

    #[test]
    fn low_similarity_is_floored() {
        let canonical: Vec<Vec<f32>> = (0..6).map(axis).collect();
        let vector = normalize(&[0.3, 0.3, 0.3, 0.3, 0.3, 0.0]);
        let result = score(&canonical, &vector).unwrap();
        assert_eq!(result.label, IntentLabel::UrgentEscalation);
        assert!((result.confidence - CONFIDENCE_FLOOR).abs() < f64::EPSILON);
    }

    #[test]
    fn review_winner_is_capped() {
        let canonical: Vec<Vec<f32>> = (0..6).map(axis).collect();
        let result = score(&canonical, &axis(5)).unwrap();
        assert_eq!(result.label, IntentLabel::RequiresReview);
        assert!((result.confidence - REVIEW_CEILING).abs() < f64::EPSILON);
    }

    #[test]
    fn mismatched_dimensions_fail_fast() {
        let canonical: Vec<Vec<f32>> = (0..6).map(axis).collect();
        let err = score(&canonical, &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, IntentError::DimensionMismatch { expected: 6, actual: 2 }));
    }

    struct CountingEmbedder {
        inner: OfflineEmbedder,
        calls: AtomicUsize,
    }

    impl Embedder for CountingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(texts).await
        }
    }

    #[tokio::test]
    async fn canonical_vectors_are_memoized_per_instance() {
        let embedder = Arc::new(CountingEmbedder {
            inner: OfflineEmbedder::default(),
            calls: AtomicUsize::new(0),
        });
        let strategy = SemanticStrategy::new(Arc::clone(&embedder));
        strategy.classify("first").await.unwrap();
        strategy.classify("second").await.unwrap();
        // one canonical batch plus one call per text
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);

        let fresh = SemanticStrategy::new(Arc::clone(&embedder));
        fresh.classify("third").await.unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn canonical_text_matches_itself() {
        let strategy = SemanticStrategy::new(Arc::new(OfflineEmbedder::default()));
        let text = format!("complaint: {}", description(IntentLabel::Complaint));
        let result = strategy.classify(&text).await.unwrap();
        assert_eq!(result.label, IntentLabel::Complaint);
        assert!(result.confidence > 0.99);
    }
}
