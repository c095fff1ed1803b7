//! Embedding provider trait definition

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::EmbeddingError;

/// Turns query text into a dense vector using a named model
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text with the given model
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f64>, EmbeddingError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Narrow an embedding to the vector store's single precision
pub fn to_f32(vector: &[f64]) -> Vec<f32> {
    vector.iter().map(|v| *v as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_f32_preserves_length_and_values() {
        let narrowed = to_f32(&[0.25, -1.5, 3.0]);

        assert_eq!(narrowed, vec![0.25f32, -1.5, 3.0]);
    }

    #[tokio::test]
    async fn test_mock_provider_returns_configured_vector() {
        let mut provider = MockEmbeddingProvider::new();
        provider
            .expect_embed()
            .withf(|model, text| model == "text-embed" && text == "hello")
            .times(1)
            .returning(|_, _| Ok(vec![0.1, 0.2]));

        let vector = provider.embed("text-embed", "hello").await.unwrap();

        assert_eq!(vector, vec![0.1, 0.2]);
    }
}
