//! Embedding error types.

/// Errors that can occur during embedding generation.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Model initialization failed (download, ONNX runtime, cache issues).
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    /// Embedding generation failed (inference error, invalid input).
    #[error("Embedding generation failed: {0}")]
    EmbedFailed(String),

    /// Model or service returned zero embeddings for a non-empty input.
    #[error("Empty result from embedding model")]
    EmptyResult,

    /// HTTP transport error talking to the embedding service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Embedding service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Embedding service throttled the request.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Vectors in one batch do not share a dimensionality.
    #[error("Dimension mismatch at index {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// The selected provider lacks required settings.
    #[error("Embedding provider '{0}' is not configured")]
    NotConfigured(String),
}
