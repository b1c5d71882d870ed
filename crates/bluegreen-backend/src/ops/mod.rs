//! Operational HTTP endpoints.
//!
//! - `/`             : service info
//! - `/health/live`  : liveness (always 200)
//! - `/health/ready` : readiness (503 while the gate is closed)
//! - `/metrics`      : Prometheus text format

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use bluegreen_core::error::BackendError;
use bluegreen_core::model::{ErrorBody, HealthResponse, ServiceInfo};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::router::ENDPOINTS;

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: state.service_name().to_string(),
        version: state.version().to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

pub async fn liveness(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::alive(state.version()))
}

pub async fn readiness(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.readiness().is_ready() {
        return Err(BackendError::NotReady.into());
    }
    Ok(Json(HealthResponse::ready(state.version())))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody { detail: "Not Found".into() }),
    )
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody { detail: "Method Not Allowed".into() }),
    )
}
