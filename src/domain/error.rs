use thiserror::Error;

use super::embedding::EmbeddingError;
use super::vector_store::SearchError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("{mode} search not implemented yet")]
    NotImplemented { mode: String },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector search failed: {0}")]
    VectorStore(#[from] SearchError),

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Coarse error taxonomy used for transport mapping and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad request input or an unsupported mode; never retried
    Validation,
    /// Unknown knowledge base; never retried
    NotFound,
    /// Embedding or vector-store failure
    Dependency,
    /// Anything else that went wrong inside the service
    Internal,
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn not_implemented(mode: impl Into<String>) -> Self {
        Self::NotImplemented { mode: mode.into() }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation { .. } | Self::NotImplemented { .. } => ErrorClass::Validation,
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Embedding(_) | Self::VectorStore(_) => ErrorClass::Dependency,
            Self::Catalog { .. } | Self::Configuration { .. } | Self::Internal { .. } => {
                ErrorClass::Internal
            }
        }
    }
}
