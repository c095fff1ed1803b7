//! Process-wide registry of vector store connections
//!
//! One handle per resolved `host:port`, kept separately per protocol. Handles
//! are created lazily, at most once per key even under concurrent first use,
//! and are never evicted or health-checked. A failed creation is not cached,
//! so the next request retries it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use super::grpc::GrpcVectorStoreClient;
use super::http::HttpVectorStoreClient;
use crate::domain::vector_store::{ConnectionTarget, Protocol, SearchError, VectorStoreClient};
use crate::infrastructure::http_client::HttpClientTrait;
use crate::infrastructure::observability::set_vector_store_connections;

/// Creates a client for a resolved endpoint
#[async_trait]
pub trait VectorStoreConnector: Send + Sync + std::fmt::Debug {
    async fn connect(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Arc<dyn VectorStoreClient>, SearchError>;
}

/// Connector for Qdrant over either protocol
#[derive(Debug, Clone)]
pub struct QdrantConnector<C: HttpClientTrait + Clone> {
    http_client: C,
    grpc_timeout: Duration,
}

impl<C: HttpClientTrait + Clone> QdrantConnector<C> {
    pub fn new(http_client: C, grpc_timeout: Duration) -> Self {
        Self {
            http_client,
            grpc_timeout,
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait + Clone + 'static> VectorStoreConnector for QdrantConnector<C> {
    async fn connect(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Arc<dyn VectorStoreClient>, SearchError> {
        let client: Arc<dyn VectorStoreClient> = match target.protocol {
            Protocol::Grpc => Arc::new(GrpcVectorStoreClient::connect(target, self.grpc_timeout)?),
            Protocol::Http => Arc::new(HttpVectorStoreClient::for_target(
                self.http_client.clone(),
                target,
            )),
        };
        Ok(client)
    }
}

type ConnectionCache = Cache<String, Arc<dyn VectorStoreClient>>;

/// Cached connections keyed by `host:port`, one cache per protocol
#[derive(Debug)]
pub struct ConnectionRegistry {
    connector: Arc<dyn VectorStoreConnector>,
    grpc: ConnectionCache,
    http: ConnectionCache,
}

impl ConnectionRegistry {
    pub fn new(connector: Arc<dyn VectorStoreConnector>) -> Self {
        Self {
            connector,
            grpc: Cache::builder().build(),
            http: Cache::builder().build(),
        }
    }

    fn cache_for(&self, protocol: Protocol) -> &ConnectionCache {
        match protocol {
            Protocol::Grpc => &self.grpc,
            Protocol::Http => &self.http,
        }
    }

    /// Return the cached client for `target`, creating it on first use
    pub async fn get_or_connect(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Arc<dyn VectorStoreClient>, SearchError> {
        let key = target.cache_key();
        let cache = self.cache_for(target.protocol);

        let client = cache
            .try_get_with(key.clone(), async {
                tracing::info!(
                    endpoint = %key,
                    protocol = %target.protocol,
                    "Opening vector store connection"
                );
                self.connector.connect(target).await
            })
            .await
            .map_err(|e: Arc<SearchError>| {
                tracing::warn!(endpoint = %key, protocol = %target.protocol, error = %e, "Vector store connection failed");
                (*e).clone()
            })?;

        set_vector_store_connections(self.connection_count().await);
        Ok(client)
    }

    /// Number of cached connection handles across both protocols
    pub async fn connection_count(&self) -> u64 {
        self.grpc.run_pending_tasks().await;
        self.http.run_pending_tasks().await;
        self.grpc.entry_count() + self.http.entry_count()
    }
}
