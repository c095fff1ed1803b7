//! Retrieval Gateway
//!
//! Semantic search over per-tenant vector stores:
//! - Knowledge bases resolved from a JSON catalog
//! - Query embeddings from Ollama
//! - Qdrant reached over gRPC or HTTP, one cached connection per endpoint
//! - Normalized, ranked results behind one request shape

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    embedding::OllamaEmbeddingClient,
    http_client::HttpClient,
    knowledge_base::JsonKnowledgeBaseCatalog,
    services::RetrievalService,
    vector_store::{ConnectionRegistry, QdrantConnector, QdrantGateway},
};
use tracing::info;

/// Create the application state, loading the catalog from the configured path
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let catalog = Arc::new(JsonKnowledgeBaseCatalog::load(&config.catalog.path).await?);
    create_app_state_with_catalog(config, catalog)
}

/// Create the application state around an already loaded catalog
pub fn create_app_state_with_catalog(
    config: &AppConfig,
    catalog: Arc<JsonKnowledgeBaseCatalog>,
) -> anyhow::Result<AppState> {
    let embedding_http = HttpClient::with_timeout(config.embedding.timeout())?;
    let embedder = Arc::new(OllamaEmbeddingClient::with_base_url(
        embedding_http,
        &config.embedding.base_url,
    ));

    let vector_store = &config.vector_store;
    let vector_http = HttpClient::with_timeout(vector_store.timeout())?;
    let connector = Arc::new(QdrantConnector::new(vector_http, vector_store.timeout()));
    let registry = Arc::new(ConnectionRegistry::new(connector));
    let gateway = Arc::new(
        QdrantGateway::new(registry, vector_store.endpoint_defaults())
            .with_vector_name(&vector_store.vector_name),
    );

    info!(
        embedding_url = %config.embedding.base_url,
        vector_store_host = %vector_store.host,
        protocol = %vector_store.protocol,
        "Retrieval services initialized"
    );

    let service = RetrievalService::new(catalog, embedder, gateway);
    Ok(AppState::new(Arc::new(service)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_create_app_state_from_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "kb-1", "embedding_model": "text-embed", "embedding_dimension": 768}}]"#
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.catalog.path = file.path().to_path_buf();

        assert!(create_app_state(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_catalog_is_startup_error() {
        let mut config = AppConfig::default();
        config.catalog.path = "/nonexistent/knowledge_bases.json".into();

        assert!(create_app_state(&config).await.is_err());
    }
}
