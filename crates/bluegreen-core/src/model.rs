//! JSON payloads exchanged over the HTTP surface.

use serde::{Deserialize, Serialize};

/// `POST /calculate` body.
///
/// `amount` is optional at the serde level so a missing field reaches
/// validation and is reported like any other invalid amount.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub amount: Option<f64>,
}

/// `POST /calculate` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub original_amount: f64,
    pub result: f64,
    pub version: String,
}

/// Body of both probe endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn alive(version: &str) -> Self {
        Self { status: "alive".into(), version: version.into() }
    }

    pub fn ready(version: &str) -> Self {
        Self { status: "ready".into(), version: version.into() }
    }
}

/// `GET /` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Error body (`{"detail": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
