//! Knowledge Base domain - per-tenant retrieval configuration

mod connection;
mod directory;
mod entity;

pub use connection::{PortValue, VectorDbConfig};
pub use directory::KnowledgeBaseDirectory;
pub use entity::KnowledgeBaseConfig;

#[cfg(test)]
pub use directory::MockKnowledgeBaseDirectory;
