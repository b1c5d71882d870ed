//! Blue-green backend library entry.
//!
//! This crate wires config, the metrics registry, the readiness gate, and the
//! HTTP handlers into an axum router. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod readiness;
pub mod router;
pub mod services;
