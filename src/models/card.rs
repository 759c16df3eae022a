//! Card data models and API response types.
//!
//! This module defines:
//! - `Card`: Database entity representing a card account
//! - `BalanceResponse`: Response body for the balance lookup endpoint

use rust_decimal::Decimal;
use serde::Serialize;

/// Represents a card record from the database.
///
/// # Database Table
///
/// Maps to the `cards` table. Each card:
/// - Is keyed by its card number
/// - Stores the PIN only as a SHA-256 hex digest
/// - Has a decimal balance (never floats)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Card {
    /// Primary key, e.g. "4111111111111111"
    pub card_number: String,

    /// SHA-256 hex digest of the card PIN (64 lowercase hex characters)
    pub pin_hash: String,

    /// Current balance
    pub balance: Decimal,

    /// Card holder display name
    pub customer_name: String,

    /// Card holder email, if known
    pub customer_email: Option<String>,
}

/// Response body for `GET /api/balance/{cardNumber}`.
///
/// # JSON Example
///
/// ```json
/// {
///   "exists": true,
///   "balance": 5000.0,
///   "customerName": "Jane Smith",
///   "cardNumber": "4111111111111111"
/// }
/// ```
///
/// Unknown cards produce `{"exists": false}` with every other field omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub exists: bool,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub balance: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
}

impl BalanceResponse {
    pub fn not_found() -> Self {
        Self {
            exists: false,
            balance: None,
            customer_name: None,
            card_number: None,
        }
    }
}

/// Convert a stored Card to its balance view.
///
/// Drops the PIN hash and email, which are never exposed over the API.
impl From<Card> for BalanceResponse {
    fn from(card: Card) -> Self {
        Self {
            exists: true,
            balance: Some(card.balance),
            customer_name: Some(card.customer_name),
            card_number: Some(card.card_number),
        }
    }
}
