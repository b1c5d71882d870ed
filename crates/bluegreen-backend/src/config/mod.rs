//! Backend config loader (strict parsing).

pub mod schema;

use std::fs;

use bluegreen_core::error::{BackendError, Result};

pub use schema::{BackendConfig, MetricsSection, ReadinessSection, ServerSection, ServiceSection};

pub fn load_from_file(path: &str) -> Result<BackendConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BackendError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BackendConfig> {
    let cfg: BackendConfig = serde_yaml::from_str(s)
        .map_err(|e| BackendError::InvalidInput(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
