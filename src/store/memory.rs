//! In-memory card store.
//!
//! A single async mutex guards cards and the transaction log together, which
//! makes `settle` atomic and serializes concurrent attempts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CardStore, Decide, Settled};
use crate::error::AppError;
use crate::models::card::Card;
use crate::models::transaction::Transaction;

#[derive(Debug, Default)]
struct Inner {
    cards: HashMap<String, Card>,
    transactions: Vec<Transaction>,
    next_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryCardStore {
    inner: Mutex<Inner>,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_card(&self, card_number: &str) -> Result<Option<Card>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.cards.get(card_number).cloned())
    }

    async fn insert_card_if_absent(&self, card: &Card) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().await;
        if inner.cards.contains_key(&card.card_number) {
            return Ok(false);
        }
        inner.cards.insert(card.card_number.clone(), card.clone());
        Ok(true)
    }

    async fn settle(&self, card_number: &str, decide: Decide<'_>) -> Result<Settled, AppError> {
        let mut inner = self.inner.lock().await;

        let settlement = decide(inner.cards.get(card_number));

        if let Some(balance) = settlement.new_balance {
            // decide only sets a balance for a card it was handed
            if let Some(card) = inner.cards.get_mut(card_number) {
                card.balance = balance;
            }
        }

        inner.next_id += 1;
        let transaction = settlement.record.into_transaction(inner.next_id);
        inner.transactions.push(transaction.clone());

        Ok(Settled {
            transaction,
            new_balance: settlement.new_balance,
        })
    }

    async fn list_transactions(
        &self,
        card_number: Option<&str>,
    ) -> Result<Vec<Transaction>, AppError> {
        let inner = self.inner.lock().await;
        let mut transactions: Vec<Transaction> = inner
            .transactions
            .iter()
            .filter(|t| card_number.is_none_or(|number| t.card_number == number))
            .cloned()
            .collect();

        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{NewTransaction, TransactionStatus};
    use crate::store::Settlement;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn card(number: &str, balance: i64) -> Card {
        Card {
            card_number: number.to_string(),
            pin_hash: "00".repeat(32),
            balance: Decimal::from(balance),
            customer_name: "Test Holder".to_string(),
            customer_email: None,
        }
    }

    fn record(number: &str, offset_secs: i64) -> NewTransaction {
        NewTransaction {
            card_number: number.to_string(),
            customer_name: None,
            transaction_type: "topup".to_string(),
            amount: Decimal::ONE,
            timestamp: Utc::now() + Duration::seconds(offset_secs),
            status: TransactionStatus::Success,
            reason: "Transaction successful".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_if_absent_never_overwrites() {
        let store = MemoryCardStore::new();

        assert!(store.insert_card_if_absent(&card("41", 10)).await.unwrap());
        assert!(!store.insert_card_if_absent(&card("41", 99)).await.unwrap());

        let stored = store.find_card("41").await.unwrap().unwrap();
        assert_eq!(stored.balance, Decimal::from(10));
    }

    #[tokio::test]
    async fn settle_applies_balance_and_assigns_increasing_ids() {
        let store = MemoryCardStore::new();
        store.insert_card_if_absent(&card("41", 10)).await.unwrap();

        let decide = |_: Option<&Card>| Settlement {
            new_balance: Some(Decimal::from(11)),
            record: record("41", 0),
        };
        let first = store.settle("41", &decide).await.unwrap();
        let second = store.settle("41", &decide).await.unwrap();

        assert_eq!(first.transaction.id, 1);
        assert_eq!(second.transaction.id, 2);
        assert_eq!(
            store.find_card("41").await.unwrap().unwrap().balance,
            Decimal::from(11)
        );
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_filters_by_card() {
        let store = MemoryCardStore::new();

        for (number, offset) in [("41", 0), ("42", 5), ("41", 10)] {
            let decide = move |_: Option<&Card>| Settlement {
                new_balance: None,
                record: record(number, offset),
            };
            store.settle(number, &decide).await.unwrap();
        }

        let all = store.list_transactions(None).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        let only_41 = store.list_transactions(Some("41")).await.unwrap();
        assert_eq!(only_41.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 1]);
    }
}
