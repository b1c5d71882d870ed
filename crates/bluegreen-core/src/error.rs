//! Shared error type across backend crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Missing, malformed, or out-of-range request fields.
    InvalidInput,
    /// Readiness gate is closed.
    NotReady,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidInput => "INVALID_INPUT",
            ClientCode::NotReady => "NOT_READY",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status code the boundary layer answers with.
    pub fn http_status(self) -> u16 {
        match self {
            ClientCode::InvalidInput => 422,
            ClientCode::NotReady => 503,
            ClientCode::Internal => 500,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Unified error type used by core and backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("Service not ready")]
    NotReady,
    #[error("internal: {0}")]
    Internal(String),
}

impl BackendError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            BackendError::InvalidInput(_) => ClientCode::InvalidInput,
            BackendError::NotReady => ClientCode::NotReady,
            BackendError::Internal(_) => ClientCode::Internal,
        }
    }
}
