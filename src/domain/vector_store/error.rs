//! Vector store errors

use thiserror::Error;

/// Failure modes of a vector-store search
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// Endpoint unreachable or connection could not be established
    #[error("vector store unreachable: {0}")]
    Connect(String),

    /// Non-success status with the captured response body
    #[error("search failed with status {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// Response shape not recognized
    #[error("failed to parse search response: {0}")]
    Decode(String),
}
