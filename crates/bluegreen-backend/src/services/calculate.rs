use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};

use bluegreen_core::calc;
use bluegreen_core::error::{BackendError, Result};
use bluegreen_core::model::{CalculateRequest, CalculateResponse};

use crate::app_state::AppState;
use crate::error::ApiError;

/// `POST /calculate`: double a positive amount.
///
/// Malformed bodies (bad JSON, a non-JSON content type, wrong field type)
/// are folded into `InvalidInput` so they answer 422 and never touch the
/// calculation counters. A body without any content type is parsed as JSON.
pub async fn calculate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<CalculateResponse>, ApiError> {
    let req = parse_body(&headers, &body)?;
    let amount = calc::validate(&req)?;

    let result = calc::double(amount);
    state.metrics().record_calculation(amount);
    tracing::debug!(amount, result, "calculated");

    Ok(Json(CalculateResponse {
        original_amount: amount,
        result,
        version: state.version().to_string(),
    }))
}

fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<CalculateRequest> {
    if let Some(ct) = headers.get(header::CONTENT_TYPE) {
        let ct = ct.to_str().unwrap_or_default();
        if !is_json_content_type(ct) {
            return Err(BackendError::InvalidInput(format!(
                "Expected request with `Content-Type: application/json` (got `{ct}`)"
            )));
        }
    }

    serde_json::from_slice(body)
        .map_err(|e| BackendError::InvalidInput(format!("invalid json body: {e}")))
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json_content_type(ct: &str) -> bool {
    let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
