//! Lightweight in-process metrics.
//!
//! Instruments are stored as atomics and rendered by the `/metrics` handler
//! in Prometheus text format. `track` holds the middleware that feeds them.

pub mod metrics;
pub mod track;
