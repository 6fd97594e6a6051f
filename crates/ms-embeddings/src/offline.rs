//! Deterministic embedder for tests and unconfigured deployments.

use rand::{Rng, SeedableRng, rngs::StdRng};
use sha2::{Digest, Sha256};

use crate::{Embedder, EmbeddingError};

/// Hash-seeded unit vectors.
///
/// The same text always maps to the same vector, across processes and
/// platforms. Vectors carry no semantic signal: two different texts are
/// as far apart as any random pair.
#[derive(Debug, Clone, Copy)]
pub struct OfflineEmbedder {
    dimension: usize,
}

impl OfflineEmbedder {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Vector for a single text.
    #[must_use]
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed_for(text));
        let raw: Vec<f32> = (0..self.dimension)
            .map(|_| rng.gen_range(0.0_f32..1.0))
            .collect();
        ms_core::vector::normalize(&raw)
    }
}

impl Default for OfflineEmbedder {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Embedder for OfflineEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

fn seed_for(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
