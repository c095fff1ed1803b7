//! Retrieval service - resolves the knowledge base, dispatches the search mode
//! and assembles the response

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::{debug, info, instrument, warn};

use crate::domain::embedding::{to_f32, EmbeddingProvider};
use crate::domain::knowledge_base::{KnowledgeBaseConfig, KnowledgeBaseDirectory};
use crate::domain::retrieval::{
    EffectiveSearch, RetrievalMode, RetrievalResult, SearchRequest, SearchResponse,
};
use crate::domain::vector_store::VectorSearch;
use crate::domain::DomainError;
use crate::infrastructure::observability::record_retrieval;

/// Unified search entry point used by the HTTP layer
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RetrievalServiceTrait: Send + Sync + Debug {
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, DomainError>;
}

/// Orchestrates embedding generation and vector search for one request
pub struct RetrievalService {
    directory: Arc<dyn KnowledgeBaseDirectory>,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_search: Arc<dyn VectorSearch>,
}

impl Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("embedding_provider", &self.embedder.provider_name())
            .finish()
    }
}

impl RetrievalService {
    pub fn new(
        directory: Arc<dyn KnowledgeBaseDirectory>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_search: Arc<dyn VectorSearch>,
    ) -> Self {
        Self {
            directory,
            embedder,
            vector_search,
        }
    }

    async fn resolve_knowledge_base(
        &self,
        kb_id: &str,
    ) -> Result<Arc<KnowledgeBaseConfig>, DomainError> {
        self.directory
            .lookup(kb_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("knowledge base '{}' not found", kb_id)))
    }

    async fn dispatch(
        &self,
        kb: &KnowledgeBaseConfig,
        search: &EffectiveSearch,
    ) -> Result<Vec<RetrievalResult>, DomainError> {
        match search.mode {
            RetrievalMode::Semantic => self.semantic_search(kb, search).await,
            RetrievalMode::Keyword | RetrievalMode::Hybrid => {
                Err(DomainError::not_implemented(search.mode.as_str()))
            }
        }
    }

    async fn semantic_search(
        &self,
        kb: &KnowledgeBaseConfig,
        search: &EffectiveSearch,
    ) -> Result<Vec<RetrievalResult>, DomainError> {
        let embedding = self.embedder.embed(&kb.embedding_model, &search.query).await?;

        if kb.embedding_dimension > 0 && embedding.len() != kb.embedding_dimension as usize {
            warn!(
                kb_id = %kb.id,
                expected = kb.embedding_dimension,
                actual = embedding.len(),
                "Embedding dimension differs from knowledge base configuration"
            );
        }

        let mut results = self
            .vector_search
            .search(
                &kb.id,
                to_f32(&embedding),
                search.top_k,
                search.score_threshold,
                kb,
            )
            .await?;

        results.truncate(search.top_k as usize);
        Ok(results)
    }
}

#[async_trait]
impl RetrievalServiceTrait for RetrievalService {
    #[instrument(skip(self, request), fields(kb_id = %request.kb_id))]
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, DomainError> {
        let start = Instant::now();
        let search = request.into_effective()?;
        let mode = search.mode;

        let outcome = async {
            let kb = self.resolve_knowledge_base(&search.kb_id).await?;
            debug!(
                kb_id = %kb.id,
                model = %kb.embedding_model,
                mode = %mode,
                top_k = search.top_k,
                "Dispatching retrieval"
            );
            self.dispatch(&kb, &search).await
        }
        .await;

        record_retrieval(mode.as_str(), outcome.is_ok(), start.elapsed());

        match outcome {
            Ok(results) => {
                info!(
                    kb_id = %search.kb_id,
                    mode = %mode,
                    results = results.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Retrieval completed"
                );
                Ok(SearchResponse::new(&search, results))
            }
            Err(e) => {
                warn!(kb_id = %search.kb_id, mode = %mode, error = %e, "Retrieval failed");
                Err(e)
            }
        }
    }
}
