//! Knowledge base directory trait

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::KnowledgeBaseConfig;
use crate::domain::DomainError;

/// Read-only lookup of knowledge base configuration
///
/// `Ok(None)` means the knowledge base does not exist; `Err` is reserved for
/// failures of the directory itself.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeBaseDirectory: Send + Sync {
    async fn lookup(&self, kb_id: &str) -> Result<Option<Arc<KnowledgeBaseConfig>>, DomainError>;
}
