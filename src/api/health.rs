//! Liveness endpoint

use axum::{http::StatusCode, response::IntoResponse};

use crate::api::types::{HealthResponse, Json};

/// Always 200; consults no dependency
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}
