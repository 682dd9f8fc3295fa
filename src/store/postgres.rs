//! PostgreSQL-backed credential store.
//!
//! # Atomicity Guarantees
//!
//! A transfer runs inside one PostgreSQL transaction. Both user rows are
//! locked with `FOR UPDATE` (in ascending id order, so two opposite transfers
//! cannot deadlock) before the sender balance is checked, and the debit,
//! credit and ledger insert commit together or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        transaction::{Counterparty, ReceivedTransaction, SentTransaction, Transaction},
        user::User,
    },
    store::Store,
};

/// Credential store over a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// A transaction row joined with the email of the other party.
#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    id: i64,
    amount: Decimal,
    sender_id: i64,
    recipient_id: i64,
    created_at: DateTime<Utc>,
    counterparty_email: String,
}

impl LedgerRow {
    fn split(self) -> (Transaction, String) {
        let transaction = Transaction {
            id: self.id,
            amount: self.amount,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            created_at: self.created_at,
        };
        (transaction, self.counterparty_email)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, balance, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, balance, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        balance: Decimal,
    ) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, balance)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, balance, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(balance)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent sign-up for the same email
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn sent_transactions(&self, user_id: i64) -> Result<Vec<SentTransaction>, AppError> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT t.id, t.amount, t.sender_id, t.recipient_id, t.created_at,
                   u.email AS counterparty_email
            FROM transactions t
            JOIN users u ON u.id = t.recipient_id
            WHERE t.sender_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (transaction, email) = row.split();
                let recipient = Counterparty {
                    id: transaction.recipient_id,
                    email,
                };
                SentTransaction {
                    transaction,
                    recipient,
                }
            })
            .collect())
    }

    async fn received_transactions(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReceivedTransaction>, AppError> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT t.id, t.amount, t.sender_id, t.recipient_id, t.created_at,
                   u.email AS counterparty_email
            FROM transactions t
            JOIN users u ON u.id = t.sender_id
            WHERE t.recipient_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (transaction, email) = row.split();
                let sender = Counterparty {
                    id: transaction.sender_id,
                    email,
                };
                ReceivedTransaction {
                    transaction,
                    sender,
                }
            })
            .collect())
    }

    async fn transfer(
        &self,
        sender_id: i64,
        recipient_id: i64,
        amount: Decimal,
    ) -> Result<SentTransaction, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock both rows in id order; concurrent transfers touching either
        // account wait here until this transaction ends
        let locked: Vec<(i64, String, Decimal)> = sqlx::query_as(
            "SELECT id, email, balance FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(vec![sender_id, recipient_id])
        .fetch_all(&mut *tx)
        .await?;

        let Some((_, _, sender_balance)) = locked.iter().find(|(id, _, _)| *id == sender_id)
        else {
            tx.rollback().await?;
            return Err(AppError::InvalidToken);
        };

        let Some((_, recipient_email, _)) = locked.iter().find(|(id, _, _)| *id == recipient_id)
        else {
            tx.rollback().await?;
            return Err(AppError::RecipientNotFound);
        };

        if *sender_balance < amount {
            tx.rollback().await?;
            return Err(AppError::InsufficientBalance);
        }

        let recipient = Counterparty {
            id: recipient_id,
            email: recipient_email.clone(),
        };

        sqlx::query("UPDATE users SET balance = balance - $1 WHERE id = $2")
            .bind(amount)
            .bind(sender_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
            .bind(amount)
            .bind(recipient_id)
            .execute(&mut *tx)
            .await?;

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (amount, sender_id, recipient_id)
            VALUES ($1, $2, $3)
            RETURNING id, amount, sender_id, recipient_id, created_at
            "#,
        )
        .bind(amount)
        .bind(sender_id)
        .bind(recipient_id)
        .fetch_one(&mut *tx)
        .await?;

        // Balance updates and ledger row become visible together
        tx.commit().await?;

        Ok(SentTransaction {
            transaction,
            recipient,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
