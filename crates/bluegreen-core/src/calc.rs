//! The business operation: double a positive amount.

use crate::error::{BackendError, Result};
use crate::model::CalculateRequest;

/// Validate a raw request and return the amount to operate on.
///
/// Rejects a missing amount, zero, negatives, and non-finite values.
pub fn validate(req: &CalculateRequest) -> Result<f64> {
    let amount = req
        .amount
        .ok_or_else(|| BackendError::InvalidInput("amount is required".into()))?;

    if !amount.is_finite() {
        return Err(BackendError::InvalidInput("amount must be a finite number".into()));
    }
    if amount <= 0.0 {
        return Err(BackendError::InvalidInput(format!(
            "amount must be greater than 0 (got {amount})"
        )));
    }
    Ok(amount)
}

/// Business rule. Callers must pass a validated amount.
pub fn double(amount: f64) -> f64 {
    amount * 2.0
}
