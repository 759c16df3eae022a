//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity for one processing attempt
//! - `NewTransaction`: A record that has not been persisted yet
//! - `TransactionRequest`: Raw body accepted by the gateway
//! - `ProcessRequest`: Validated body forwarded to the core service
//! - `ProcessResponse`: Body returned by both services

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome stored on every transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

/// Supported transaction kinds.
///
/// Parsing is case-insensitive: "Withdraw", "TOPUP" and so on are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Withdraw,
    Topup,
}

impl TransactionType {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("withdraw") {
            Some(TransactionType::Withdraw)
        } else if raw.eq_ignore_ascii_case("topup") {
            Some(TransactionType::Topup)
        } else {
            None
        }
    }
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Rows are append-only: exactly one row is
/// written per processing attempt, whether it succeeded or failed.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 42,
///   "cardNumber": "4111111111111111",
///   "customerName": "Jane Smith",
///   "type": "withdraw",
///   "amount": 200.0,
///   "timestamp": "2025-12-21T16:00:00Z",
///   "status": "SUCCESS",
///   "reason": "Transaction successful"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Auto-generated, monotonically increasing identifier
    pub id: i64,

    /// Card the attempt was made against (may not exist for "Invalid card")
    pub card_number: String,

    /// Card holder name, absent when the card is unknown
    pub customer_name: Option<String>,

    /// Type exactly as submitted, e.g. "withdraw" or "TopUp"
    #[serde(rename = "type")]
    pub transaction_type: String,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,

    pub timestamp: DateTime<Utc>,

    /// "SUCCESS" or "FAILED"
    pub status: String,

    /// Human-readable reason, e.g. "Insufficient balance"
    pub reason: String,
}

/// A transaction record waiting to be appended to the log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub card_number: String,
    pub customer_name: Option<String>,
    pub transaction_type: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub reason: String,
}

impl NewTransaction {
    /// Attach the identifier assigned by the store.
    pub fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            card_number: self.card_number,
            customer_name: self.customer_name,
            transaction_type: self.transaction_type,
            amount: self.amount,
            timestamp: self.timestamp,
            status: self.status.as_str().to_string(),
            reason: self.reason,
        }
    }
}

/// Request body accepted by the gateway (`POST /api/transaction`).
///
/// Every field is optional so that missing values produce the gateway's own
/// validation messages instead of a deserialization rejection.
///
/// # JSON Example
///
/// ```json
/// {
///   "cardNumber": "4111111111111111",
///   "pin": "5678",
///   "amount": 200,
///   "type": "withdraw"
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub card_number: Option<String>,
    pub pin: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Request body for the core service (`POST /api/process`).
///
/// The gateway builds one of these from a validated `TransactionRequest` and
/// forwards it unchanged. `transaction_type` keeps the caller's casing.
///
/// `amount` goes out as a decimal string so no digits are lost between the
/// services; incoming bodies may use a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub card_number: String,
    pub pin: String,
    #[serde(serialize_with = "rust_decimal::serde::str::serialize")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: String,
}

/// Response body for transaction processing.
///
/// # JSON Examples
///
/// ```json
/// {"status": "SUCCESS", "message": "Transaction processed successfully", "newBalance": 4800.0}
/// {"status": "FAILED", "message": "FAILED: Insufficient balance"}
/// ```
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub status: String,
    pub message: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub new_balance: Option<Decimal>,
}

impl ProcessResponse {
    pub fn success(new_balance: Decimal) -> Self {
        Self {
            status: TransactionStatus::Success.as_str().to_string(),
            message: "Transaction processed successfully".to_string(),
            new_balance: Some(new_balance),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TransactionStatus::Failed.as_str().to_string(),
            message: message.into(),
            new_balance: None,
        }
    }
}
