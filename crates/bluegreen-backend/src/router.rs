//! Axum router wiring.
//!
//! `build_router` registers the routes and hands them to `instrument`, which
//! wraps the whole router once with the metrics middleware.

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use bluegreen_core::model::ErrorBody;

use crate::{app_state::AppState, obs, ops, services};
use crate::obs::metrics::BackendMetrics;

/// Routes advertised by `GET /`.
pub const ENDPOINTS: [&str; 4] = ["/calculate", "/health/live", "/health/ready", "/metrics"];

pub fn build_router(state: AppState) -> Router {
    let metrics = state.metrics();

    let routes = Router::new()
        .route("/", get(ops::root).fallback(ops::method_not_allowed))
        .route("/calculate", post(services::calculate).fallback(ops::method_not_allowed))
        .route("/health/live", get(ops::liveness).fallback(ops::method_not_allowed))
        .route("/health/ready", get(ops::readiness).fallback(ops::method_not_allowed))
        .route("/metrics", get(ops::metrics).fallback(ops::method_not_allowed))
        .fallback(ops::not_found)
        .with_state(state);

    instrument(routes, metrics)
}

/// Wrap `router` so every request is counted, timed, and tracked in
/// `active_requests`. Panics inside handlers become 500s before the metrics
/// layer sees the response.
pub fn instrument(router: Router, metrics: Arc<BackendMetrics>) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(metrics, obs::track::track_requests))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let msg = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = msg, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { detail: "Internal Server Error".into() }),
    )
        .into_response()
}
