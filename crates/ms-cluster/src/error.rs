//! Clustering error types.

/// Errors raised for malformed clustering input.
///
/// Degenerate but well-formed input (tiny batches, empty vocabularies)
/// never errors; it produces the documented fallback values instead.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("{texts} texts but {embeddings} embeddings")]
    LengthMismatch { texts: usize, embeddings: usize },

    #[error("Dimension mismatch at index {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
