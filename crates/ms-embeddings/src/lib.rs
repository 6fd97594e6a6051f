//! # ms-embeddings
//!
//! Text-to-vector capability for mailsort.
//!
//! Three embedders implement [`Embedder`]:
//! - [`AzureEmbedder`]: Azure OpenAI embeddings deployment, one request per
//!   text, bounded concurrency, input order preserved
//! - [`LocalEmbedder`]: fastembed `AllMiniLML6V2` on the ONNX runtime
//! - [`OfflineEmbedder`]: deterministic hash-seeded unit vectors
//!
//! [`EmbeddingProvider::from_config`] picks one from [`ms_config::MailsortConfig`].

mod azure;
pub mod error;
pub mod http;
mod local;
mod offline;
mod provider;

pub use azure::AzureEmbedder;
pub use error::EmbeddingError;
pub use local::LocalEmbedder;
pub use offline::OfflineEmbedder;
pub use provider::EmbeddingProvider;

use futures::{StreamExt, TryStreamExt, stream};

/// Maps texts to fixed-dimension vectors, one per input, in input order.
pub trait Embedder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`EmbeddingError`] if any text fails to embed.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;
}

/// Run `embed_one` over `texts` with at most `concurrency` calls in flight.
///
/// Output order follows input order. The first failure aborts the batch.
///
/// # Errors
///
/// Returns the first error produced by `embed_one`.
pub async fn embed_ordered<'a, F, Fut>(
    texts: &'a [String],
    concurrency: usize,
    embed_one: F,
) -> Result<Vec<Vec<f32>>, EmbeddingError>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<Vec<f32>, EmbeddingError>>,
{
    let pending: Vec<Fut> = texts.iter().map(|text| embed_one(text)).collect();
    stream::iter(pending)
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Check that every vector has the same length as the first.
///
/// # Errors
///
/// Returns [`EmbeddingError::DimensionMismatch`] naming the first offender.
pub fn ensure_uniform_dimension(vectors: &[Vec<f32>]) -> Result<usize, EmbeddingError> {
    let Some(first) = vectors.first() else {
        return Ok(0);
    };
    let expected = first.len();
    match vectors.iter().position(|v| v.len() != expected) {
        Some(index) => Err(EmbeddingError::DimensionMismatch {
            index,
            expected,
            actual: vectors[index].len(),
        }),
        None => Ok(expected),
    }
}
