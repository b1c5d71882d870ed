//! Request metrics middleware.
//!
//! `track_requests` wraps every handler: it bumps `active_requests`, times
//! the call, and records `(path, method, status, latency)` once the response
//! exists. The gauge is released by [`InFlight`]'s `Drop`, so it comes back
//! down even when the inner future unwinds.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::metrics::BackendMetrics;

/// Holds one unit of `active_requests` for as long as it lives.
pub struct InFlight {
    metrics: Arc<BackendMetrics>,
}

impl InFlight {
    pub fn enter(metrics: Arc<BackendMetrics>) -> Self {
        metrics.increment_active();
        Self { metrics }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.metrics.decrement_active();
    }
}

pub async fn track_requests(
    State(metrics): State<Arc<BackendMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let endpoint = req.uri().path().to_owned();
    let method = req.method().as_str().to_owned();

    let in_flight = InFlight::enter(Arc::clone(&metrics));
    let start = Instant::now();

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();
    metrics.record_request(&endpoint, &method, status, latency);
    drop(in_flight);

    response
}
