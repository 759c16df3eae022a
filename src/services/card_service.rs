//! Card service - Core business logic for processing card transactions.
//!
//! This service handles:
//! - PIN hashing and verification
//! - Balance validation for withdrawals
//! - Recording exactly one transaction per processing attempt
//! - Seeding the demo cards
//!
//! The decision itself (`evaluate`) is a pure function. Stores call it while
//! holding the card lock, which makes the balance change and the log entry a
//! single atomic unit.

use chrono::Utc;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::models::card::Card;
use crate::models::transaction::{
    NewTransaction, ProcessRequest, Transaction, TransactionStatus, TransactionType,
};
use crate::store::{CardStore, Settled, Settlement};

/// Why a processing attempt was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    InvalidCard,
    InvalidPin,
    InsufficientBalance,
    InvalidTransactionType,
    /// The new balance would not fit in a `Decimal`
    InvalidAmount,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::InvalidCard => "Invalid card",
            DeclineReason::InvalidPin => "Invalid PIN",
            DeclineReason::InsufficientBalance => "Insufficient balance",
            DeclineReason::InvalidTransactionType => "Invalid transaction type",
            DeclineReason::InvalidAmount => "Invalid amount",
        }
    }
}

const SUCCESS_REASON: &str = "Transaction successful";

/// Hash a PIN the way it is stored on cards.
///
/// Plain SHA-256, lowercase hex, no salt.
pub fn hash_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}

/// Decide the outcome of one attempt against the current card state.
///
/// # Checks (first failure wins)
///
/// 1. Card exists
/// 2. PIN hash matches
/// 3. Type is withdraw (with enough balance) or topup
/// 4. The resulting balance is representable
///
/// The record keeps the type exactly as submitted.
pub fn evaluate(card: Option<&Card>, request: &ProcessRequest) -> Settlement {
    let customer_name = card.map(|c| c.customer_name.clone());
    let transaction_type = TransactionType::parse(&request.transaction_type);

    let outcome = match card {
        None => Err(DeclineReason::InvalidCard),
        Some(card) if hash_pin(&request.pin) != card.pin_hash => Err(DeclineReason::InvalidPin),
        Some(card) => match transaction_type {
            Some(TransactionType::Withdraw) if card.balance < request.amount => {
                Err(DeclineReason::InsufficientBalance)
            }
            Some(TransactionType::Withdraw) => card
                .balance
                .checked_sub(request.amount)
                .ok_or(DeclineReason::InvalidAmount),
            Some(TransactionType::Topup) => card
                .balance
                .checked_add(request.amount)
                .ok_or(DeclineReason::InvalidAmount),
            None => Err(DeclineReason::InvalidTransactionType),
        },
    };

    let (new_balance, status, reason) = match outcome {
        Ok(balance) => (Some(balance), TransactionStatus::Success, SUCCESS_REASON),
        Err(decline) => (None, TransactionStatus::Failed, decline.as_str()),
    };

    Settlement {
        new_balance,
        record: NewTransaction {
            card_number: request.card_number.clone(),
            customer_name,
            transaction_type: request.transaction_type.clone(),
            amount: request.amount,
            timestamp: Utc::now(),
            status,
            reason: reason.to_string(),
        },
    }
}

/// Process one transaction attempt.
///
/// # Process
///
/// 1. Lock the card in the store
/// 2. Evaluate the attempt against the locked state
/// 3. Apply the balance change (success only) and append the log record
/// 4. Commit both together
///
/// # Returns
///
/// The persisted transaction and, on success, the card's new balance.
///
/// # Errors
///
/// - `Database`: the store failed; nothing was written
pub async fn process_transaction(
    store: &dyn CardStore,
    request: &ProcessRequest,
) -> Result<Settled, AppError> {
    let decide = |card: Option<&Card>| evaluate(card, request);
    let settled = store.settle(&request.card_number, &decide).await?;

    let transaction = &settled.transaction;
    tracing::info!(
        card = %mask_card_number(&transaction.card_number),
        transaction_type = %transaction.transaction_type,
        amount = %transaction.amount,
        status = %transaction.status,
        reason = %transaction.reason,
        "transaction processed"
    );

    Ok(settled)
}

/// Get a card by card number.
pub async fn get_card(store: &dyn CardStore, card_number: &str) -> Result<Option<Card>, AppError> {
    store.find_card(card_number).await
}

/// Transactions for one card, newest first.
pub async fn get_customer_transactions(
    store: &dyn CardStore,
    card_number: &str,
) -> Result<Vec<Transaction>, AppError> {
    store.list_transactions(Some(card_number)).await
}

/// Every transaction, newest first.
pub async fn get_all_transactions(store: &dyn CardStore) -> Result<Vec<Transaction>, AppError> {
    store.list_transactions(None).await
}

/// Cards inserted at startup for demos: (number, PIN, balance in cents, name, email).
const DEMO_CARDS: [(&str, &str, i64, &str, &str); 2] = [
    (
        "4123456789012345",
        "1234",
        1_000_000,
        "John Doe",
        "john.doe@example.com",
    ),
    (
        "4111111111111111",
        "5678",
        500_000,
        "Jane Smith",
        "jane.smith@example.com",
    ),
];

/// Insert the demo cards that do not exist yet.
///
/// Existing cards keep their balances, so restarting the service is safe.
///
/// # Returns
///
/// Number of cards inserted.
pub async fn seed_demo_cards(store: &dyn CardStore) -> Result<usize, AppError> {
    let mut inserted = 0;
    for (number, pin, cents, name, email) in DEMO_CARDS {
        let card = Card {
            card_number: number.to_string(),
            pin_hash: hash_pin(pin),
            balance: Decimal::new(cents, 2),
            customer_name: name.to_string(),
            customer_email: Some(email.to_string()),
        };
        if store.insert_card_if_absent(&card).await? {
            tracing::info!(card = %mask_card_number(number), balance = %card.balance, "seeded demo card");
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Keep only the last four digits for logs.
pub fn mask_card_number(card_number: &str) -> String {
    let visible = card_number
        .char_indices()
        .rev()
        .nth(3)
        .map(|(idx, _)| &card_number[idx..])
        .unwrap_or(card_number);
    format!("****{}", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCardStore;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn jane() -> Card {
        Card {
            card_number: "4111111111111111".to_string(),
            pin_hash: hash_pin("5678"),
            balance: dec("5000.00"),
            customer_name: "Jane Smith".to_string(),
            customer_email: None,
        }
    }

    fn request(pin: &str, amount: &str, transaction_type: &str) -> ProcessRequest {
        ProcessRequest {
            card_number: "4111111111111111".to_string(),
            pin: pin.to_string(),
            amount: dec(amount),
            transaction_type: transaction_type.to_string(),
        }
    }

    #[test]
    fn hash_pin_is_lowercase_sha256_hex() {
        assert_eq!(
            hash_pin("1234"),
            "03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4"
        );
    }

    #[test]
    fn withdraw_within_balance_debits() {
        let settlement = evaluate(Some(&jane()), &request("5678", "200", "withdraw"));

        assert_eq!(settlement.new_balance, Some(dec("4800.00")));
        assert_eq!(settlement.record.status, TransactionStatus::Success);
        assert_eq!(settlement.record.reason, "Transaction successful");
        assert_eq!(settlement.record.customer_name.as_deref(), Some("Jane Smith"));
    }

    #[test]
    fn withdraw_of_entire_balance_is_allowed() {
        let settlement = evaluate(Some(&jane()), &request("5678", "5000", "withdraw"));
        assert_eq!(settlement.new_balance, Some(Decimal::ZERO));
    }

    #[test]
    fn withdraw_over_balance_is_declined() {
        let settlement = evaluate(Some(&jane()), &request("5678", "10000", "withdraw"));

        assert_eq!(settlement.new_balance, None);
        assert_eq!(settlement.record.status, TransactionStatus::Failed);
        assert_eq!(settlement.record.reason, "Insufficient balance");
    }

    #[test]
    fn topup_credits_exact_amount_and_keeps_submitted_type() {
        let settlement = evaluate(Some(&jane()), &request("5678", "0.01", "TopUp"));

        assert_eq!(settlement.new_balance, Some(dec("5000.01")));
        assert_eq!(settlement.record.transaction_type, "TopUp");
    }

    #[test]
    fn topup_overflowing_decimal_is_declined_not_panicking() {
        let mut card = jane();
        card.balance = Decimal::MAX;

        let settlement = evaluate(Some(&card), &request("5678", "1", "topup"));

        assert_eq!(settlement.new_balance, None);
        assert_eq!(settlement.record.status, TransactionStatus::Failed);
        assert_eq!(settlement.record.reason, "Invalid amount");
    }

    #[test]
    fn withdraw_of_negative_amount_past_max_is_declined() {
        let mut card = jane();
        card.balance = Decimal::MAX;

        let settlement = evaluate(Some(&card), &request("5678", "-1", "withdraw"));

        assert_eq!(settlement.new_balance, None);
        assert_eq!(settlement.record.reason, "Invalid amount");
    }

    #[test]
    fn pin_is_checked_before_type_and_balance() {
        let settlement = evaluate(Some(&jane()), &request("0000", "99999", "refund"));
        assert_eq!(settlement.record.reason, "Invalid PIN");
    }

    #[test]
    fn unknown_card_is_declined_even_with_a_valid_pin() {
        let settlement = evaluate(None, &request("5678", "1", "topup"));

        assert_eq!(settlement.new_balance, None);
        assert_eq!(settlement.record.reason, "Invalid card");
        assert_eq!(settlement.record.customer_name, None);
    }

    #[test]
    fn unsupported_type_keeps_raw_value() {
        let settlement = evaluate(Some(&jane()), &request("5678", "1", "refund"));

        assert_eq!(settlement.record.reason, "Invalid transaction type");
        assert_eq!(settlement.record.transaction_type, "refund");
    }

    #[test]
    fn mask_keeps_last_four_digits() {
        assert_eq!(mask_card_number("4111111111111111"), "****1111");
        assert_eq!(mask_card_number("41"), "****41");
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryCardStore::new();

        assert_eq!(seed_demo_cards(&store).await.unwrap(), 2);
        assert_eq!(seed_demo_cards(&store).await.unwrap(), 0);

        let john = store.find_card("4123456789012345").await.unwrap().unwrap();
        assert_eq!(john.balance, dec("10000.00"));
        assert_eq!(john.pin_hash, hash_pin("1234"));
    }

    #[tokio::test]
    async fn concurrent_withdrawals_never_overdraw() {
        let store = std::sync::Arc::new(MemoryCardStore::new());
        store.insert_card_if_absent(&jane()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                process_transaction(store.as_ref(), &request("5678", "1000", "withdraw"))
                    .await
                    .unwrap()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().transaction.status == "SUCCESS" {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(
            store.find_card("4111111111111111").await.unwrap().unwrap().balance,
            Decimal::ZERO
        );
        assert_eq!(store.list_transactions(None).await.unwrap().len(), 10);
    }
}
