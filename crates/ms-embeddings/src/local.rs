//! Local ONNX embedder backed by fastembed.
//!
//! Uses `AllMiniLML6V2` (384 dimensions, mean pooling). Model files are
//! downloaded on first use and cached at `~/.mailsort/cache/fastembed/`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::{Embedder, EmbeddingError};

/// Offline-capable semantic embedder.
///
/// [`TextEmbedding::embed`] needs `&mut self` and blocks, so the model sits
/// behind a mutex and inference runs on the blocking pool.
#[derive(Clone)]
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedder {
    /// Load the model, downloading it on first run (~80MB).
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if download or ONNX initialization fails.
    pub fn new() -> Result<Self, EmbeddingError> {
        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir())
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }

    /// Output dimensionality (always 384 for `AllMiniLML6V2`).
    #[must_use]
    pub const fn dimension() -> usize {
        384
    }
}

impl Embedder for LocalEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let model = Arc::clone(&self.model);
        let batch = texts.to_vec();
        let expected = batch.len();
        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))?;
            model
                .embed(batch, None)
                .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
        })
        .await
        .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))??;

        if vectors.len() != expected {
            return Err(EmbeddingError::EmptyResult);
        }
        Ok(vectors)
    }
}

fn cache_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".fastembed_cache"),
        |h| h.join(".mailsort").join("cache").join("fastembed"),
    )
}
