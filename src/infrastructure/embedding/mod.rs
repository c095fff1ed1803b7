//! Embedding provider implementations

mod ollama;

pub use ollama::{OllamaEmbeddingClient, DEFAULT_OLLAMA_BASE_URL};
