//! Embedding provider domain models and traits

mod error;
mod provider;

pub use error::EmbeddingError;
pub use provider::{to_f32, EmbeddingProvider};

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
