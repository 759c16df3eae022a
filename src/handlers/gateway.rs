//! Gateway HTTP handlers.
//!
//! This module implements the gateway's API endpoints:
//! - POST /api/transaction - Validate, route and forward a transaction
//! - GET /api/ping - Liveness check

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    models::transaction::{ProcessResponse, TransactionRequest},
    services::{
        card_service::mask_card_number,
        gateway_service::{self, CoreClient, UNSUPPORTED_RANGE},
    },
};

/// Submit a transaction through the gateway.
///
/// # Request Body
///
/// ```json
/// {
///   "cardNumber": "4111111111111111",
///   "pin": "5678",
///   "amount": 200,
///   "type": "withdraw"
/// }
/// ```
///
/// # Response
///
/// - **400**: Validation failed, e.g. `{"status": "FAILED", "message": "PIN is required"}`,
///   including bodies that are not JSON or carry mistyped fields
/// - **200**: Card outside the routed range, `{"status": "FAILED", "message": "Card range not supported"}`
/// - **200 / 400**: Core service answer, relayed unchanged
/// - **503**: Core service unreachable or misbehaving
pub async fn handle_transaction(
    State(core): State<CoreClient>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let request = gateway_service::validate(request)?;

    if !gateway_service::is_supported_range(&request.card_number) {
        tracing::info!(
            card = %mask_card_number(&request.card_number),
            "rejected card outside routed range"
        );
        let body = ProcessResponse::failed(UNSUPPORTED_RANGE);
        return Ok((StatusCode::OK, Json(body)).into_response());
    }

    let (status, body) = core.forward(&request).await?;
    tracing::debug!(status = %status, "core service answered");

    Ok((status, Json(body)).into_response())
}

/// Liveness check, answers `pong`.
pub async fn ping() -> &'static str {
    "pong"
}
