//! Embedding client errors

use thiserror::Error;

/// Failure modes of a single embedding call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbeddingError {
    /// Connection or transport failure before a response was received
    #[error("embedding request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("embedding API error: status={status}, body={body}")]
    BadStatus { status: u16, body: String },

    /// The response body could not be decoded
    #[error("decode embedding response failed: {0}")]
    Decode(String),

    /// The endpoint returned a zero-length vector
    #[error("empty embedding returned")]
    Empty,
}
