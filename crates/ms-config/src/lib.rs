//! # ms-config
//!
//! Layered configuration loading for mailsort using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MAILSORT_*` prefix, `__` as separator)
//! 2. Azure deployment variables (`AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`, ...)
//!    and `PORT`
//! 3. Project-level `.mailsort/config.toml`
//! 4. User-level `~/.config/mailsort/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MAILSORT_CLUSTERING__MIN_CLUSTER_SIZE` -> `clustering.min_cluster_size`,
//! `MAILSORT_EMBEDDING__PROVIDER` -> `embedding.provider`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ms_config::MailsortConfig;
//!
//! let config = MailsortConfig::load_with_dotenv().expect("config");
//!
//! if config.azure_openai.intent_configured() {
//!     println!("external intent model: {}", config.azure_openai.intent_deployment);
//! }
//! ```

mod azure;
mod clustering;
mod embedding;
mod error;
mod intent;
mod server;

pub use azure::AzureOpenAiConfig;
pub use clustering::ClusteringConfig;
pub use embedding::{EmbeddingConfig, EmbeddingProviderKind};
pub use error::ConfigError;
pub use intent::IntentConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unprefixed variables understood for compatibility with existing deployments.
const AZURE_ENV_KEYS: [(&str, &str); 6] = [
    ("AZURE_OPENAI_ENDPOINT", "azure_openai.endpoint"),
    ("AZURE_OPENAI_API_KEY", "azure_openai.api_key"),
    ("AZURE_OPENAI_API_VERSION", "azure_openai.api_version"),
    (
        "AZURE_OPENAI_EMBEDDINGS_DEPLOYMENT",
        "azure_openai.embeddings_deployment",
    ),
    ("AZURE_OPENAI_INTENT_DEPLOYMENT", "azure_openai.intent_deployment"),
    ("PORT", "server.port"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MailsortConfig {
    #[serde(default)]
    pub azure_openai: AzureOpenAiConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub intent: IntentConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl MailsortConfig {
    /// Load and validate configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or a
    /// validation error from [`Self::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".mailsort/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Azure deployment variables
        figment = figment.merge(Self::azure_env());

        // Layer 4: Prefixed environment variables (highest priority)
        figment.merge(Env::prefixed("MAILSORT_").split("__"))
    }

    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for out-of-range numbers and
    /// [`ConfigError::NotConfigured`] when the Azure embedder is forced
    /// without its deployment settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clustering.min_cluster_size < 2 {
            return Err(invalid(
                "clustering.min_cluster_size",
                "must be at least 2",
            ));
        }
        if self.embedding.concurrency == 0 {
            return Err(invalid("embedding.concurrency", "must be at least 1"));
        }
        if self.embedding.offline_dimension == 0 {
            return Err(invalid("embedding.offline_dimension", "must be at least 1"));
        }
        if self.embedding.provider == EmbeddingProviderKind::Azure
            && !self.azure_openai.embeddings_configured()
        {
            return Err(ConfigError::NotConfigured {
                section: "azure_openai".to_string(),
            });
        }
        Ok(())
    }

    /// The provider actually used once `auto` is resolved.
    #[must_use]
    pub fn resolved_provider(&self) -> EmbeddingProviderKind {
        match self.embedding.provider {
            EmbeddingProviderKind::Auto if self.azure_openai.embeddings_configured() => {
                EmbeddingProviderKind::Azure
            }
            EmbeddingProviderKind::Auto => EmbeddingProviderKind::Offline,
            other => other,
        }
    }

    fn azure_env() -> Env {
        Env::raw().filter_map(|key| {
            AZURE_ENV_KEYS
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| (*path).into())
        })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mailsort").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
