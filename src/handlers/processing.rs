//! Core processing HTTP handler.
//!
//! - POST /api/process - Authenticate the PIN, apply the balance change and log the attempt

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    error::AppError,
    models::transaction::{ProcessRequest, ProcessResponse},
    services::card_service,
    store::SharedStore,
};

/// Process a transaction against a card.
///
/// Every call appends exactly one transaction record, including declines.
///
/// # Response (200)
///
/// ```json
/// {
///   "status": "SUCCESS",
///   "message": "Transaction processed successfully",
///   "newBalance": 4800.0
/// }
/// ```
///
/// # Response (400)
///
/// ```json
/// {
///   "status": "FAILED",
///   "message": "FAILED: Insufficient balance"
/// }
/// ```
pub async fn process(
    State(store): State<SharedStore>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProcessResponse>), AppError> {
    let Json(request) = payload?;
    let settled = card_service::process_transaction(store.as_ref(), &request).await?;

    let (status, body) = match settled.new_balance {
        Some(balance) => (StatusCode::OK, ProcessResponse::success(balance)),
        None => (
            StatusCode::BAD_REQUEST,
            ProcessResponse::failed(format!("FAILED: {}", settled.transaction.reason)),
        ),
    };

    Ok((status, Json(body)))
}
