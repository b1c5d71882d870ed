//! HTTP mapping for `BackendError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use bluegreen_core::error::{BackendError, ClientCode};
use bluegreen_core::model::ErrorBody;

/// Boundary wrapper so handlers can return `Result<_, ApiError>` and use `?`
/// on core results.
#[derive(Debug)]
pub struct ApiError(pub BackendError);

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = StatusCode::from_u16(code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let detail = match code {
            ClientCode::Internal => {
                tracing::error!(code = code.as_str(), error = %self.0, "request failed");
                "Internal Server Error".to_string()
            }
            ClientCode::InvalidInput | ClientCode::NotReady => {
                tracing::debug!(code = code.as_str(), error = %self.0, "request rejected");
                self.0.to_string()
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
