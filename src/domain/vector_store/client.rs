//! Vector store client and search traits

use std::fmt::Debug;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{Protocol, SearchError, VectorQuery};
use crate::domain::knowledge_base::KnowledgeBaseConfig;
use crate::domain::retrieval::RetrievalResult;

/// A live connection to one vector store endpoint over one protocol
///
/// Implementations return results in the order the store ranked them, with
/// `rank` assigned from 1.
#[async_trait]
pub trait VectorStoreClient: Send + Sync + Debug {
    /// Protocol this client speaks
    fn protocol(&self) -> Protocol;

    /// Run a similarity search
    async fn search(&self, query: &VectorQuery) -> Result<Vec<RetrievalResult>, SearchError>;
}

/// Similarity search routed to whichever endpoint a knowledge base lives on
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Search `collection` with `query_vector`; a negative `score_threshold`
    /// disables the score floor
    async fn search(
        &self,
        collection: &str,
        query_vector: Vec<f32>,
        top_k: u32,
        score_threshold: f64,
        kb: &KnowledgeBaseConfig,
    ) -> Result<Vec<RetrievalResult>, SearchError>;
}
