//! Shared application state for the backend.
//!
//! The metrics registry and readiness gate are built here once and handed to
//! the router; handlers and middleware reach them through `State<AppState>`.

use std::sync::Arc;

use bluegreen_core::error::Result;

use crate::config::BackendConfig;
use crate::obs::metrics::BackendMetrics;
use crate::readiness::Readiness;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<BackendConfig>,
    metrics: Arc<BackendMetrics>,
    readiness: Arc<Readiness>,
}

impl AppState {
    /// Build application state from a config, validating it first.
    pub fn new(cfg: BackendConfig) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(BackendMetrics::new(&cfg.metrics.namespace));
        let readiness = Arc::new(Readiness::new(cfg.readiness.initial));

        Ok(Self {
            cfg: Arc::new(cfg),
            metrics,
            readiness,
        })
    }

    /// Version string reported by every JSON endpoint.
    pub fn version(&self) -> &str {
        &self.cfg.service.version
    }

    pub fn service_name(&self) -> &str {
        &self.cfg.service.name
    }

    pub fn metrics(&self) -> Arc<BackendMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn readiness(&self) -> Arc<Readiness> {
        Arc::clone(&self.readiness)
    }
}
