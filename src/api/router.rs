use std::time::Duration;

use axum::{middleware, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::debug;
use super::middleware::{cors_middleware, logging_middleware, metrics_middleware};
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
///
/// `request_timeout` bounds each inbound request; when it fires the handler
/// future is dropped together with its in-flight embedding and vector store
/// calls.
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    request_timeout: Duration,
) -> Router {
    let mut router = Router::new()
        .nest("/api/v1/debug", debug::create_debug_router())
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
}
