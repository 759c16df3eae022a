//! Core query HTTP handlers.
//!
//! This module implements the read-only endpoints used by dashboards:
//! - GET /api/balance/{cardNumber} - Balance and holder name
//! - GET /api/transactions/customer/{cardNumber} - One card's history
//! - GET /api/transactions/all - Every transaction

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppError,
    models::{card::BalanceResponse, transaction::Transaction},
    services::card_service,
    store::SharedStore,
};

/// Look up a card's balance.
///
/// # Response (200 OK)
///
/// ```json
/// {"exists": true, "balance": 5000.0, "customerName": "Jane Smith", "cardNumber": "4111111111111111"}
/// ```
///
/// Unknown cards are not an error: the response is `{"exists": false}`.
pub async fn balance(
    State(store): State<SharedStore>,
    Path(card_number): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let response = card_service::get_card(store.as_ref(), &card_number)
        .await?
        .map(BalanceResponse::from)
        .unwrap_or_else(BalanceResponse::not_found);

    Ok(Json(response))
}

/// List one card's transactions, newest first.
///
/// Unknown cards still get their failed attempts listed.
pub async fn customer_transactions(
    State(store): State<SharedStore>,
    Path(card_number): Path<String>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = card_service::get_customer_transactions(store.as_ref(), &card_number).await?;
    Ok(Json(transactions))
}

/// List every transaction, newest first.
pub async fn all_transactions(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(card_service::get_all_transactions(store.as_ref()).await?))
}
