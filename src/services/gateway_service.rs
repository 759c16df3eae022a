//! Gateway service - request validation, card-range routing and forwarding.
//!
//! The gateway holds no state of its own. Accepted requests are forwarded to
//! the core service and its answer is relayed back unchanged.

use std::time::Duration;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use url::Url;

use crate::error::AppError;
use crate::models::transaction::{ProcessRequest, TransactionRequest, TransactionType};

/// Message returned for card numbers outside the routed range.
pub const UNSUPPORTED_RANGE: &str = "Card range not supported";

/// Validate a raw gateway request.
///
/// # Checks (first failure wins)
///
/// 1. `cardNumber` present and not blank
/// 2. `pin` present and not blank
/// 3. `amount` present and greater than zero
/// 4. `type` present and not blank
/// 5. `type` is "withdraw" or "topup" (any casing)
///
/// # Errors
///
/// `Validation` carrying the client-facing message of the first failed check.
pub fn validate(request: TransactionRequest) -> Result<ProcessRequest, AppError> {
    let card_number = request
        .card_number
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::validation("Card number is required"))?;

    let pin = request
        .pin
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::validation("PIN is required"))?;

    let amount = request
        .amount
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or_else(|| AppError::validation("Amount must be greater than 0"))?;

    let transaction_type = request
        .transaction_type
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::validation("Transaction type is required"))?;

    if TransactionType::parse(&transaction_type).is_none() {
        return Err(AppError::validation(
            "Transaction type must be 'withdraw' or 'topup'",
        ));
    }

    Ok(ProcessRequest {
        card_number,
        pin,
        amount,
        transaction_type,
    })
}

/// Only cards whose number starts with `4` are routed to the core service.
pub fn is_supported_range(card_number: &str) -> bool {
    card_number.starts_with('4')
}

/// HTTP client for the core service's processing endpoint.
#[derive(Debug, Clone)]
pub struct CoreClient {
    http: reqwest::Client,
    process_url: Url,
}

impl CoreClient {
    /// Build a client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(process_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, process_url })
    }

    pub fn process_url(&self) -> &Url {
        &self.process_url
    }

    /// Forward a validated request and return the core's status and JSON body.
    ///
    /// Success (2xx) and rejection (4xx) answers are relayed as-is; the core
    /// uses 400 for declined transactions.
    ///
    /// # Errors
    ///
    /// `Upstream` when the call fails, times out, returns 5xx or a non-JSON body.
    pub async fn forward(&self, request: &ProcessRequest) -> Result<(StatusCode, Value), AppError> {
        let response = self
            .http
            .post(self.process_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AppError::Upstream(format!("core service returned {}", status)));
        }

        let body = response.json::<Value>().await?;
        Ok((status, body))
    }
}
