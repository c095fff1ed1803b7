//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod knowledge_base;
pub mod retrieval;
pub mod vector_store;

pub use embedding::{EmbeddingError, EmbeddingProvider};
pub use error::{DomainError, ErrorClass};
pub use knowledge_base::{KnowledgeBaseConfig, KnowledgeBaseDirectory, PortValue, VectorDbConfig};
pub use retrieval::{
    EffectiveSearch, FusionMethod, RetrievalMode, RetrievalResult, SearchConfig, SearchRequest,
    SearchResponse,
};
pub use vector_store::{
    ConnectionTarget, EndpointDefaults, Protocol, SearchError, VectorQuery, VectorSearch,
    VectorStoreClient,
};
