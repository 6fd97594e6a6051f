//! Embedding provider selection.

use std::fmt;

use serde::{Deserialize, Serialize};

const fn default_offline_dimension() -> usize {
    32
}

const fn default_concurrency() -> usize {
    4
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Which embedder backs a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Azure when its embedding deployment is configured, otherwise offline.
    #[default]
    Auto,
    /// Azure OpenAI embeddings deployment.
    Azure,
    /// Local ONNX model via fastembed.
    Local,
    /// Deterministic hash-seeded unit vectors.
    Offline,
}

impl EmbeddingProviderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Azure => "azure",
            Self::Local => "local",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    /// Vector length produced by the offline embedder.
    #[serde(default = "default_offline_dimension")]
    pub offline_dimension: usize,

    /// Maximum in-flight per-text embedding calls. Results keep input order.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout for the remote embedder.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            offline_dimension: default_offline_dimension(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
