//! Knowledge base configuration record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::VectorDbConfig;

/// Per-knowledge-base retrieval settings, owned by the catalog
///
/// Records are shared as `Arc<KnowledgeBaseConfig>` and never mutated once
/// loaded; a catalog reload replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub id: String,
    #[serde(default)]
    pub embedding_provider: String,
    pub embedding_model: String,
    #[serde(default)]
    pub embedding_dimension: u32,
    #[serde(default)]
    pub vector_db_type: String,
    #[serde(default)]
    pub vector_db_config: Option<VectorDbConfig>,
    /// Catalog fields owned by the surrounding application
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KnowledgeBaseConfig {
    pub fn new(id: impl Into<String>, embedding_model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            embedding_provider: "ollama".to_string(),
            embedding_model: embedding_model.into(),
            embedding_dimension: 0,
            vector_db_type: "qdrant".to_string(),
            vector_db_config: None,
            extra: Map::new(),
        }
    }

    pub fn with_embedding_dimension(mut self, dimension: u32) -> Self {
        self.embedding_dimension = dimension;
        self
    }

    pub fn with_vector_db_config(mut self, config: VectorDbConfig) -> Self {
        self.vector_db_config = Some(config);
        self
    }

    pub fn vector_db_config(&self) -> Option<&VectorDbConfig> {
        self.vector_db_config.as_ref()
    }
}
