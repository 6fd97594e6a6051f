//! Azure OpenAI embeddings deployment client.

use std::time::Duration;

use ms_config::AzureOpenAiConfig;
use serde::Deserialize;

use crate::{Embedder, EmbeddingError, embed_ordered, http::check_response};

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

/// One request per text against `{endpoint}/openai/deployments/{name}/embeddings`.
///
/// Up to `concurrency` requests are in flight at once; results keep input
/// order regardless of completion order.
pub struct AzureEmbedder {
    http: reqwest::Client,
    url: String,
    api_key: String,
    concurrency: usize,
}

impl AzureEmbedder {
    /// # Errors
    ///
    /// Returns [`EmbeddingError::NotConfigured`] when the endpoint, key or
    /// deployment is missing, or [`EmbeddingError::Http`] if the client
    /// cannot be built.
    pub fn new(
        config: &AzureOpenAiConfig,
        concurrency: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        if !config.embeddings_configured() {
            return Err(EmbeddingError::NotConfigured("azure".to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent("mailsort/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: config.deployment_url(&config.embeddings_deployment, "embeddings"),
            api_key: config.api_key.clone(),
            concurrency: concurrency.max(1),
        })
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let resp = self
            .http
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&serde_json::json!({ "input": text }))
            .send()
            .await?;
        let resp = check_response::<EmbeddingError>(resp).await?;
        let body: EmbeddingsResponse = resp.json().await?;
        first_embedding(body)
    }
}

impl Embedder for AzureEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        tracing::debug!(count = texts.len(), "requesting azure embeddings");
        embed_ordered(texts, self.concurrency, |text| self.embed_text(text)).await
    }
}

fn first_embedding(body: EmbeddingsResponse) -> Result<Vec<f32>, EmbeddingError> {
    body.data
        .into_iter()
        .next()
        .map(|item| item.embedding)
        .filter(|v| !v.is_empty())
        .ok_or(EmbeddingError::EmptyResult)
}
