//! Vector store domain - endpoint resolution, queries and client contracts

mod client;
mod endpoint;
mod error;
mod query;

pub use client::{VectorSearch, VectorStoreClient};
pub use endpoint::{
    resolve_target, ConnectionTarget, EndpointDefaults, Protocol, BINARY_PROTOCOL_PORT,
    TEXT_PROTOCOL_PORT,
};
pub use error::SearchError;
pub use query::{VectorQuery, DEFAULT_VECTOR_NAME};

#[cfg(test)]
pub use client::MockVectorSearch;
