//! Vector store gateway - per-request endpoint resolution and search

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::registry::ConnectionRegistry;
use crate::domain::knowledge_base::KnowledgeBaseConfig;
use crate::domain::retrieval::RetrievalResult;
use crate::domain::vector_store::{
    resolve_target, EndpointDefaults, SearchError, VectorQuery, VectorSearch, DEFAULT_VECTOR_NAME,
};
use crate::infrastructure::observability::record_vector_search;

/// Routes each search to the endpoint its knowledge base lives on
#[derive(Debug)]
pub struct QdrantGateway {
    registry: Arc<ConnectionRegistry>,
    defaults: EndpointDefaults,
    vector_name: String,
}

impl QdrantGateway {
    pub fn new(registry: Arc<ConnectionRegistry>, defaults: EndpointDefaults) -> Self {
        Self {
            registry,
            defaults,
            vector_name: DEFAULT_VECTOR_NAME.to_string(),
        }
    }

    pub fn with_vector_name(mut self, vector_name: impl Into<String>) -> Self {
        self.vector_name = vector_name.into();
        self
    }

    pub fn defaults(&self) -> &EndpointDefaults {
        &self.defaults
    }
}

#[async_trait]
impl VectorSearch for QdrantGateway {
    async fn search(
        &self,
        collection: &str,
        query_vector: Vec<f32>,
        top_k: u32,
        score_threshold: f64,
        kb: &KnowledgeBaseConfig,
    ) -> Result<Vec<RetrievalResult>, SearchError> {
        let target = resolve_target(kb.vector_db_config(), &self.defaults);
        let protocol = target.protocol;

        tracing::debug!(
            kb_id = %kb.id,
            endpoint = %target.cache_key(),
            protocol = %protocol,
            top_k = top_k,
            "Resolved vector store endpoint"
        );

        let query = VectorQuery::new(collection, query_vector, top_k as u64)
            .with_vector_name(&self.vector_name)
            .with_score_threshold(score_threshold);

        let start = Instant::now();
        let outcome = match self.registry.get_or_connect(&target).await {
            Ok(client) => client.search(&query).await,
            Err(e) => Err(e),
        };
        record_vector_search(protocol.as_str(), outcome.is_ok(), start.elapsed());

        match &outcome {
            Ok(results) => tracing::debug!(
                kb_id = %kb.id,
                endpoint = %target.cache_key(),
                results = results.len(),
                "Vector search completed"
            ),
            Err(e) => tracing::warn!(
                kb_id = %kb.id,
                endpoint = %target.cache_key(),
                protocol = %protocol,
                error = %e,
                "Vector search failed"
            ),
        }

        outcome
    }
}
