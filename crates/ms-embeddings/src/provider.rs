//! Embedder selected from configuration.

use std::time::Duration;

use ms_config::{EmbeddingProviderKind, MailsortConfig};

use crate::{AzureEmbedder, Embedder, EmbeddingError, LocalEmbedder, OfflineEmbedder};

/// Closed set of embedders a run can use.
pub enum EmbeddingProvider {
    Azure(AzureEmbedder),
    Local(LocalEmbedder),
    Offline(OfflineEmbedder),
}

impl EmbeddingProvider {
    /// Build the embedder named by `embedding.provider`, resolving `auto`.
    ///
    /// # Errors
    ///
    /// Propagates construction failures of the selected embedder.
    pub fn from_config(config: &MailsortConfig) -> Result<Self, EmbeddingError> {
        let kind = config.resolved_provider();
        tracing::info!(provider = %kind, "selected embedder");
        match kind {
            EmbeddingProviderKind::Azure => Ok(Self::Azure(AzureEmbedder::new(
                &config.azure_openai,
                config.embedding.concurrency,
                Duration::from_secs(config.embedding.timeout_secs),
            )?)),
            EmbeddingProviderKind::Local => Ok(Self::Local(LocalEmbedder::new()?)),
            EmbeddingProviderKind::Offline | EmbeddingProviderKind::Auto => Ok(Self::Offline(
                OfflineEmbedder::new(config.embedding.offline_dimension),
            )),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EmbeddingProviderKind {
        match self {
            Self::Azure(_) => EmbeddingProviderKind::Azure,
            Self::Local(_) => EmbeddingProviderKind::Local,
            Self::Offline(_) => EmbeddingProviderKind::Offline,
        }
    }
}

impl Embedder for EmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        match self {
            Self::Azure(inner) => inner.embed(texts).await,
            Self::Local(inner) => inner.embed(texts).await,
            Self::Offline(inner) => inner.embed(texts).await,
        }
    }
}
