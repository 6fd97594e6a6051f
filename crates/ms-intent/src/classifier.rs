//! Hybrid intent classifier.

use std::sync::Arc;

use ms_config::MailsortConfig;
use ms_core::IntentResult;
use ms_embeddings::Embedder;

use crate::arbitration::arbitrate;
use crate::error::IntentError;
use crate::external::ExternalClassifier;
use crate::rules;
use crate::semantic::SemanticStrategy;

/// Runs the rule strategy plus either the external model (when configured)
/// or the embedding strategy, and arbitrates by confidence.
pub struct IntentClassifier<E> {
    semantic: SemanticStrategy<E>,
    external: Option<ExternalClassifier>,
}

impl<E: Embedder> IntentClassifier<E> {
    /// Classifier without an external model.
    #[must_use]
    pub fn new(embedder: Arc<E>) -> Self {
        Self {
            semantic: SemanticStrategy::new(embedder),
            external: None,
        }
    }

    /// Classifier with the external model enabled when `intent_deployment`
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::Http`] if the external HTTP client cannot be built.
    pub fn from_config(embedder: Arc<E>, config: &MailsortConfig) -> Result<Self, IntentError> {
        let external = ExternalClassifier::from_config(&config.azure_openai, &config.intent)?;
        tracing::info!(external = external.is_some(), "intent classifier ready");
        Ok(Self {
            semantic: SemanticStrategy::new(embedder),
            external,
        })
    }

    #[must_use]
    pub const fn has_external(&self) -> bool {
        self.external.is_some()
    }

    /// Classify one conversation text.
    ///
    /// # Errors
    ///
    /// Propagates failures of the external model or the embedder; they are
    /// never reported as a low-confidence result.
    pub async fn classify(&self, text: &str) -> Result<IntentResult, IntentError> {
        let rule = rules::classify(text);
        if let Some(external) = &self.external {
            let answer = external.classify(text).await?;
            return Ok(arbitrate(rule, None, Some(answer)));
        }
        let embedding = self.semantic.classify(text).await?;
        Ok(arbitrate(rule, Some(embedding), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_core::IntentLabel;
    use ms_embeddings::OfflineEmbedder;

    #[tokio::test]
    async fn strong_rule_beats_offline_embedding() {
        let classifier = IntentClassifier::new(Arc::new(OfflineEmbedder::default()));
        let result = classifier
            .classify("URGENT complaint about the broken heater")
            .await
            .unwrap();
        assert_eq!(result.label, IntentLabel::UrgentEscalation);
        assert!((result.confidence - 0.85).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn no_keyword_never_scores_below_embedding_floor() {
        let classifier = IntentClassifier::new(Arc::new(OfflineEmbedder::default()));
        let result = classifier.classify("Lunch on Friday?").await.unwrap();
        // the embedding strategy always reports at least 0.5, beating the 0.4 rule fallback
        assert!(result.confidence >= 0.5);
    }

    #[test]
    fn default_config_has_no_external_model() {
        let classifier = IntentClassifier::from_config(
            Arc::new(OfflineEmbedder::default()),
            &MailsortConfig::default(),
        )
        .unwrap();
        assert!(!classifier.has_external());
    }
}
