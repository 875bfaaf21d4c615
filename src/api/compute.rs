use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use tracing::{error, info, warn};

use super::AppState;
use super::error::ApiError;
use super::model::{MultiplyResponse, Numbers, SumResponse};
use crate::aggregate::Operation;

/// POST /sum
pub async fn sum(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SumResponse>, ApiError> {
    let (token, sum) = compute(&state, Operation::Sum, body)?;
    Ok(Json(SumResponse { token, sum }))
}

/// POST /multiply
pub async fn multiply(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<MultiplyResponse>, ApiError> {
    let (token, multiply) = compute(&state, Operation::Multiply, body)?;
    Ok(Json(MultiplyResponse { token, multiply }))
}

/// Decode a request body; an empty body decodes to an empty request
fn decode_numbers(body: Result<Bytes, BytesRejection>) -> Result<Numbers, ApiError> {
    let body = body.map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    if body.is_empty() {
        return Ok(Numbers::default());
    }

    let Json(nums) = Json::<Numbers>::from_bytes(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    Ok(nums)
}

/// Validate the request, reduce its values and store the result under a fresh key
fn compute(
    state: &AppState,
    op: Operation,
    body: Result<Bytes, BytesRejection>,
) -> Result<(String, f64), ApiError> {
    let nums = decode_numbers(body).inspect_err(|e| {
        if let ApiError::InvalidBody(reason) = e {
            error!("Failed to bind {:?} request body: {}", op, reason);
        }
    })?;

    if nums.token.is_empty() {
        warn!("Rejected {:?} request without token", op);
        return Err(ApiError::MissingToken);
    }

    match &nums.values {
        Some(values) => info!("Received numbers: {:?}", values),
        None => info!("Received numbers: nil slice"),
    }

    let result = op.apply(nums.values.as_deref().unwrap_or_default());
    info!("Calculated {:?}: {}", op, result);

    let key = state.keys.next_key(op.key_prefix());
    state.store.save(nums.token.as_str(), key, result);

    Ok((nums.token, result))
}
