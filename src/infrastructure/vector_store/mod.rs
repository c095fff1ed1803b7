//! Vector store infrastructure - Qdrant clients, connection registry and gateway

mod gateway;
mod grpc;
mod http;
mod normalize;
mod registry;

pub use gateway::QdrantGateway;
pub use grpc::GrpcVectorStoreClient;
pub use http::HttpVectorStoreClient;
pub use normalize::{extract_value, normalize_query_response};
pub use registry::{ConnectionRegistry, QdrantConnector, VectorStoreConnector};
