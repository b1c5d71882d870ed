use std::net::SocketAddr;

use serde::Deserialize;
use bluegreen_core::error::{BackendError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub readiness: ReadinessSection,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            service: ServiceSection::default(),
            metrics: MetricsSection::default(),
            readiness: ReadinessSection::default(),
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BackendError::InvalidInput(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.service.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            BackendError::InvalidInput(format!(
                "server.listen must be a valid socket address ({}): {e}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Reported by every JSON endpoint. Lets blue and green deployments of the
    /// same build be told apart.
    #[serde(default = "default_service_version")]
    pub version: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            version: default_service_version(),
        }
    }
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BackendError::InvalidInput("service.name must not be empty".into()));
        }
        if self.version.trim().is_empty() {
            return Err(BackendError::InvalidInput("service.version must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Prefix joined to every metric name with `_`. Empty disables it.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self { namespace: default_namespace() }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.namespace.chars();
        let valid = match chars.next() {
            None => true,
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            Some(_) => false,
        };
        if !valid {
            return Err(BackendError::InvalidInput(format!(
                "metrics.namespace is not a valid metric name prefix: {}",
                self.namespace
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessSection {
    #[serde(default = "default_initial_ready")]
    pub initial: bool,
}

impl Default for ReadinessSection {
    fn default() -> Self {
        Self { initial: default_initial_ready() }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_service_name() -> String {
    "backend".into()
}
fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
fn default_namespace() -> String {
    "backend".into()
}
fn default_initial_ready() -> bool {
    true
}
