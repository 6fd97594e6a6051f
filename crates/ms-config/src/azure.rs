//! Azure OpenAI service configuration (embeddings and intent deployments).

use serde::{Deserialize, Serialize};

/// Default REST API version.
fn default_api_version() -> String {
    String::from("2024-02-15-preview")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: String,

    /// API key sent in the `api-key` header.
    #[serde(default)]
    pub api_key: String,

    /// REST API version query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Deployment serving the embedding model.
    #[serde(default)]
    pub embeddings_deployment: String,

    /// Deployment serving the chat model used for intent classification.
    #[serde(default)]
    pub intent_deployment: String,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: default_api_version(),
            embeddings_deployment: String::new(),
            intent_deployment: String::new(),
        }
    }
}

impl AzureOpenAiConfig {
    fn has_credentials(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty()
    }

    /// Whether the embedding deployment can be called.
    pub fn embeddings_configured(&self) -> bool {
        self.has_credentials() && !self.embeddings_deployment.is_empty()
    }

    /// Whether the external intent classifier can be called.
    pub fn intent_configured(&self) -> bool {
        self.has_credentials() && !self.intent_deployment.is_empty()
    }

    /// URL of a deployment operation, e.g. `embeddings` or `chat/completions`.
    pub fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{deployment}/{operation}?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.api_version
        )
    }
}
