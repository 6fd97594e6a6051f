//! Cross-cutting error types for mailsort.
//!
//! Domain-specific errors (e.g., `ClusterError`, `IntentError`) are defined in
//! their respective crates. `ms-cli` converges them through `anyhow`.

use thiserror::Error;

/// Errors raised by the shared model types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two sequences that must stay index-aligned have different lengths.
    #[error("Length mismatch: expected {expected} items, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A string did not name one of the known intent categories.
    #[error("Unknown intent label: {0}")]
    UnknownIntent(String),
}
