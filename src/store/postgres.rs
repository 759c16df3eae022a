//! PostgreSQL card store.
//!
//! # Atomicity Guarantees
//!
//! `settle` runs inside one PostgreSQL transaction. The card row is locked
//! with `FOR UPDATE`, so concurrent attempts against the same card queue up
//! behind each other instead of overwriting each other's balance.
//!
//! Money columns are unconstrained `NUMERIC`, so any amount a `Decimal` can
//! hold is stored without rounding.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{CardStore, Decide, Settled};
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::card::Card;
use crate::models::transaction::Transaction;

pub struct PgCardStore {
    pool: DbPool,
}

impl PgCardStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardStore for PgCardStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_card(&self, card_number: &str) -> Result<Option<Card>, AppError> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT card_number, pin_hash, balance, customer_name, customer_email
            FROM cards
            WHERE card_number = $1
            "#,
        )
        .bind(card_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn insert_card_if_absent(&self, card: &Card) -> Result<bool, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO cards (card_number, pin_hash, balance, customer_name, customer_email)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (card_number) DO NOTHING
            "#,
        )
        .bind(&card.card_number)
        .bind(&card.pin_hash)
        .bind(card.balance)
        .bind(&card.customer_name)
        .bind(&card.customer_email)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn settle(&self, card_number: &str, decide: Decide<'_>) -> Result<Settled, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the card row until commit
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT card_number, pin_hash, balance, customer_name, customer_email
            FROM cards
            WHERE card_number = $1
            FOR UPDATE
            "#,
        )
        .bind(card_number)
        .fetch_optional(&mut *tx)
        .await?;

        let settlement = decide(card.as_ref());

        // Report the balance as stored, not as computed
        let new_balance = match settlement.new_balance {
            Some(balance) => Some(
                sqlx::query_scalar::<_, Decimal>(
                    r#"
                    UPDATE cards
                    SET balance = $1,
                        updated_at = NOW()
                    WHERE card_number = $2
                    RETURNING balance
                    "#,
                )
                .bind(balance)
                .bind(card_number)
                .fetch_one(&mut *tx)
                .await?,
            ),
            None => None,
        };

        let record = settlement.record;
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                card_number,
                customer_name,
                transaction_type,
                amount,
                timestamp,
                status,
                reason
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, card_number, customer_name, transaction_type, amount, timestamp, status, reason
            "#,
        )
        .bind(&record.card_number)
        .bind(&record.customer_name)
        .bind(&record.transaction_type)
        .bind(record.amount)
        .bind(record.timestamp)
        .bind(record.status.as_str())
        .bind(&record.reason)
        .fetch_one(&mut *tx)
        .await?;

        // Balance update and log row become visible together
        tx.commit().await?;

        Ok(Settled {
            transaction,
            new_balance,
        })
    }

    async fn list_transactions(
        &self,
        card_number: Option<&str>,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, card_number, customer_name, transaction_type, amount, timestamp, status, reason
            FROM transactions
            WHERE $1::TEXT IS NULL OR card_number = $1
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(card_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
