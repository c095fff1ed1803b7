//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const INVALID_REQUEST: &str = "invalid request";
pub const RETRIEVAL_FAILED: &str = "retrieval failed";

/// Error body returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: error.into(),
                message: message.into(),
            },
        }
    }

    /// The request body could not be accepted
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_REQUEST, message)
    }

    /// The request was well-formed but retrieval did not complete
    pub fn retrieval_failed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, RETRIEVAL_FAILED, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Validation { .. } => Self::bad_request(err.to_string()),
            _ => Self::retrieval_failed(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.error, self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::EmbeddingError;
    use crate::domain::vector_store::SearchError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let api_err: ApiError = DomainError::validation("query is required").into();

        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.response.error, "invalid request");
        assert!(api_err.response.message.contains("query is required"));
    }

    #[test]
    fn test_not_found_maps_to_retrieval_failed() {
        let api_err: ApiError = DomainError::not_found("knowledge base 'kb-x' not found").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error, "retrieval failed");
        assert!(api_err.response.message.contains("kb-x"));
    }

    #[test]
    fn test_not_implemented_maps_to_retrieval_failed() {
        let api_err: ApiError = DomainError::not_implemented("hybrid").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api_err.response.message.contains("hybrid"));
    }

    #[test]
    fn test_dependency_errors_keep_cause() {
        let embed: ApiError = DomainError::from(EmbeddingError::BadStatus {
            status: 502,
            body: "upstream down".to_string(),
        })
        .into();
        let search: ApiError =
            DomainError::from(SearchError::Connect("qdrant:6334 refused".to_string())).into();

        assert_eq!(embed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(embed.response.message.contains("upstream down"));
        assert_eq!(search.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(search.response.message.contains("qdrant:6334"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::bad_request("missing field `kb_id`");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"error": "invalid request", "message": "missing field `kb_id`"})
        );
    }
}
