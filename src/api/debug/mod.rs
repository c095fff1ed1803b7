//! Debug API - retrieval endpoints used by the knowledge-management UI

mod retrieve;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::health;
use crate::api::state::AppState;

pub use retrieve::unified_search;

/// Routes mounted under `/api/v1/debug`
pub fn create_debug_router() -> Router<AppState> {
    Router::new()
        .route("/retrieve/unified", post(unified_search))
        .route("/health", get(health::health_check))
}
