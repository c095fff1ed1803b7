//! JSON-file backed knowledge base catalog

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::knowledge_base::{KnowledgeBaseConfig, KnowledgeBaseDirectory};
use crate::domain::DomainError;

type CatalogMap = HashMap<String, Arc<KnowledgeBaseConfig>>;

/// Read-only catalog of knowledge base records
///
/// The file holds a JSON array of records. A reload swaps the whole map, so a
/// record already handed to a request is never touched.
#[derive(Debug)]
pub struct JsonKnowledgeBaseCatalog {
    path: Option<PathBuf>,
    records: RwLock<CatalogMap>,
}

impl JsonKnowledgeBaseCatalog {
    /// Load the catalog from `path`; a missing or malformed file is an error
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let records = read_catalog(&path).await?;

        tracing::info!(
            path = %path.display(),
            knowledge_bases = records.len(),
            "Loaded knowledge base catalog"
        );

        Ok(Self {
            path: Some(path),
            records: RwLock::new(records),
        })
    }

    /// Build an in-memory catalog that cannot be reloaded
    pub fn from_records(records: impl IntoIterator<Item = KnowledgeBaseConfig>) -> Self {
        Self {
            path: None,
            records: RwLock::new(index_records(records.into_iter().collect())),
        }
    }

    /// Re-read the backing file and replace every record
    ///
    /// On failure the previous records stay in place.
    pub async fn reload(&self) -> Result<usize, DomainError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| DomainError::catalog("catalog has no backing file"))?;

        let records = read_catalog(path).await?;
        let count = records.len();
        *self.records.write().await = records;

        tracing::info!(path = %path.display(), knowledge_bases = count, "Reloaded knowledge base catalog");
        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl KnowledgeBaseDirectory for JsonKnowledgeBaseCatalog {
    async fn lookup(&self, kb_id: &str) -> Result<Option<Arc<KnowledgeBaseConfig>>, DomainError> {
        Ok(self.records.read().await.get(kb_id).cloned())
    }
}

async fn read_catalog(path: &Path) -> Result<CatalogMap, DomainError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::catalog(format!(
            "failed to read catalog {}: {}",
            path.display(),
            e
        ))
    })?;

    let records: Vec<KnowledgeBaseConfig> = serde_json::from_str(&raw).map_err(|e| {
        DomainError::catalog(format!(
            "failed to parse catalog {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(index_records(records))
}

fn index_records(records: Vec<KnowledgeBaseConfig>) -> CatalogMap {
    let mut map = CatalogMap::with_capacity(records.len());
    for record in records {
        let id = record.id.clone();
        if map.insert(id.clone(), Arc::new(record)).is_some() {
            tracing::warn!(kb_id = %id, "Duplicate knowledge base id in catalog, keeping the last record");
        }
    }
    map
}
