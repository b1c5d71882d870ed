//! In-process HTTP helpers shared by the router tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bluegreen_backend::{app_state::AppState, config::BackendConfig, router};

pub fn app() -> (AppState, Router) {
    let state = AppState::new(BackendConfig::default()).expect("default config must build");
    let router = router::build_router(state.clone());
    (state, router)
}

pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get(router: &Router, path: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(router, req).await
}

pub async fn post_json(router: &Router, path: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, req).await
}

pub fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("body must be json")
}
