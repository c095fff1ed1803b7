//! Unified retrieval endpoint

use axum::extract::State;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiEnvelope, ApiError, Json};
use crate::domain::retrieval::{SearchRequest, SearchResponse};

/// POST /api/v1/debug/retrieve/unified
pub async fn unified_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ApiEnvelope<SearchResponse>>, ApiError> {
    debug!(kb_id = %request.kb_id, "Unified search request");

    let kb_id = request.kb_id.clone();
    let response = state
        .retrieval_service
        .search(request)
        .await
        .map_err(|e| {
            warn!(kb_id = %kb_id, error = %e, "Unified search failed");
            ApiError::from(e)
        })?;

    Ok(Json(ApiEnvelope::ok(response.message.clone(), response)))
}
