//! Intent classification error types.

use ms_embeddings::EmbeddingError;
use ms_embeddings::http::ServiceError;

/// Failures of a classification strategy.
///
/// Remote failures are never folded into a low-confidence result; they
/// propagate so the caller can decide to retry or skip.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// The embedder failed for the text or the canonical descriptions.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// HTTP transport error talking to the external classifier.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// External classifier returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// External classifier throttled the request.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// External classifier answered with something that is not the expected JSON.
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),

    /// Text and canonical vectors disagree in dimensionality.
    #[error("Dimension mismatch: canonical vectors have {expected} dimensions, text has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedder returned the wrong number of vectors.
    #[error("expected {expected} embeddings, got {actual}")]
    MissingEmbedding { expected: usize, actual: usize },
}

impl ServiceError for IntentError {
    fn rate_limited(retry_after_secs: u64) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    fn api(status: u16, message: String) -> Self {
        Self::Api { status, message }
    }
}
