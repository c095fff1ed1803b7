//! Ollama embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::{EmbeddingError, EmbeddingProvider};
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Ollama embedding provider
#[derive(Debug)]
pub struct OllamaEmbeddingClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> OllamaEmbeddingClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }

    fn parse_response(body: &str) -> Result<Vec<f64>, EmbeddingError> {
        let response: OllamaEmbeddingResponse = serde_json::from_str(body)
            .map_err(|e| EmbeddingError::Decode(e.to_string()))?;

        if response.embedding.is_empty() {
            return Err(EmbeddingError::Empty);
        }

        Ok(response.embedding)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OllamaEmbeddingClient<C> {
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        let url = self.embeddings_url();
        let body = serde_json::json!({
            "model": model,
            "prompt": text,
        });

        let response = self
            .client
            .post_json(&url, vec![("Content-Type", "application/json")], &body)
            .await
            .map_err(|e| EmbeddingError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(EmbeddingError::BadStatus {
                status: response.status,
                body: response.body,
            });
        }

        let embedding = Self::parse_response(&response.body)?;
        tracing::debug!(
            model = model,
            dimensions = embedding.len(),
            "Generated query embedding"
        );
        Ok(embedding)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f64>,
}
