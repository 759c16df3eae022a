//! Repository traits for card and transaction data access.
//!
//! Business logic in `services` only talks to `CardStore`, so the same
//! processing procedure runs against PostgreSQL in production and against
//! `MemoryCardStore` in tests or when no database is configured.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::AppError;
use crate::models::card::Card;
use crate::models::transaction::{NewTransaction, Transaction};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCardStore;
pub use postgres::PgCardStore;

/// Shared handle used as axum state by the core service.
pub type SharedStore = Arc<dyn CardStore>;

/// What one processing attempt decided for a card.
///
/// `new_balance` is `Some` only when the card balance must change.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub new_balance: Option<Decimal>,
    pub record: NewTransaction,
}

/// Decision callback run by `CardStore::settle` while the card is locked.
///
/// Receives the current card (or `None` when the number is unknown).
pub type Decide<'a> = &'a (dyn Fn(Option<&Card>) -> Settlement + Sync);

/// Result of a settled attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    pub transaction: Transaction,
    pub new_balance: Option<Decimal>,
}

#[async_trait]
pub trait CardStore: Send + Sync {
    /// Backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    /// Get a card by card number.
    async fn find_card(&self, card_number: &str) -> Result<Option<Card>, AppError>;

    /// Insert a card unless one with the same number already exists.
    ///
    /// Returns `true` if the card was inserted.
    async fn insert_card_if_absent(&self, card: &Card) -> Result<bool, AppError>;

    /// Run one processing attempt atomically.
    ///
    /// Locks the card, calls `decide`, applies the balance change (if any) and
    /// appends the transaction record. Either both writes land or neither does.
    async fn settle(&self, card_number: &str, decide: Decide<'_>) -> Result<Settled, AppError>;

    /// List transactions, newest first. `None` lists every card.
    async fn list_transactions(
        &self,
        card_number: Option<&str>,
    ) -> Result<Vec<Transaction>, AppError>;
}
