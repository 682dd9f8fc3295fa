//! In-memory credential store used by the router tests.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    error::AppError,
    models::{
        transaction::{Counterparty, ReceivedTransaction, SentTransaction, Transaction},
        user::User,
    },
    store::Store,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    transactions: Vec<Transaction>,
}

impl Tables {
    fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn counterparty(&self, id: i64) -> Counterparty {
        Counterparty {
            id,
            email: self.user(id).map(|u| u.email.clone()).unwrap_or_default(),
        }
    }
}

impl MemoryStore {
    /// Every recorded transaction, in insertion order.
    pub async fn all_transactions(&self) -> Vec<Transaction> {
        self.inner.lock().await.transactions.clone()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.inner.lock().await.user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        balance: Decimal,
    ) -> Result<User, AppError> {
        let mut tables = self.inner.lock().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailTaken);
        }

        let user = User {
            id: tables.users.len() as i64 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            balance,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn sent_transactions(&self, user_id: i64) -> Result<Vec<SentTransaction>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables
            .transactions
            .iter()
            .filter(|t| t.sender_id == user_id)
            .map(|t| SentTransaction {
                transaction: t.clone(),
                recipient: tables.counterparty(t.recipient_id),
            })
            .collect())
    }

    async fn received_transactions(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReceivedTransaction>, AppError> {
        let tables = self.inner.lock().await;
        Ok(tables
            .transactions
            .iter()
            .filter(|t| t.recipient_id == user_id)
            .map(|t| ReceivedTransaction {
                transaction: t.clone(),
                sender: tables.counterparty(t.sender_id),
            })
            .collect())
    }

    async fn transfer(
        &self,
        sender_id: i64,
        recipient_id: i64,
        amount: Decimal,
    ) -> Result<SentTransaction, AppError> {
        // The whole operation runs under one lock, like a serialized database transaction
        let mut tables = self.inner.lock().await;

        let sender_balance = tables.user(sender_id).ok_or(AppError::InvalidToken)?.balance;
        if tables.user(recipient_id).is_none() {
            return Err(AppError::RecipientNotFound);
        }
        if sender_balance < amount {
            return Err(AppError::InsufficientBalance);
        }

        for user in tables.users.iter_mut() {
            if user.id == sender_id {
                user.balance -= amount;
            } else if user.id == recipient_id {
                user.balance += amount;
            }
        }

        let transaction = Transaction {
            id: tables.transactions.len() as i64 + 1,
            amount,
            sender_id,
            recipient_id,
            created_at: Utc::now(),
        };
        tables.transactions.push(transaction.clone());

        Ok(SentTransaction {
            transaction,
            recipient: tables.counterparty(recipient_id),
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transfer_moves_exact_amount_and_records_one_entry() {
        let store = MemoryStore::default();
        let alice = store
            .create_user("alice@example.com", "hash", Decimal::new(100, 0))
            .await
            .unwrap();
        let bob = store
            .create_user("bob@example.com", "hash", Decimal::new(5, 0))
            .await
            .unwrap();

        let sent = store
            .transfer(alice.id, bob.id, Decimal::new(2550, 2))
            .await
            .unwrap();

        assert_eq!(sent.recipient.email, "bob@example.com");
        let alice = store.find_user_by_id(alice.id).await.unwrap().unwrap();
        let bob = store.find_user_by_id(bob.id).await.unwrap().unwrap();
        assert_eq!(alice.balance, Decimal::new(7450, 2));
        assert_eq!(bob.balance, Decimal::new(3050, 2));
        assert_eq!(store.all_transactions().await.len(), 1);
    }

    #[tokio::test]
    async fn rejects_overdraft_without_mutation() {
        let store = MemoryStore::default();
        let alice = store
            .create_user("alice@example.com", "hash", Decimal::new(10, 0))
            .await
            .unwrap();
        let bob = store
            .create_user("bob@example.com", "hash", Decimal::ZERO)
            .await
            .unwrap();

        let result = store.transfer(alice.id, bob.id, Decimal::new(11, 0)).await;

        assert!(matches!(result, Err(AppError::InsufficientBalance)));
        let alice = store.find_user_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(alice.balance, Decimal::new(10, 0));
        assert!(store.all_transactions().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::default();
        store
            .create_user("alice@example.com", "hash", Decimal::ZERO)
            .await
            .unwrap();

        let result = store
            .create_user("alice@example.com", "other", Decimal::ZERO)
            .await;

        assert!(matches!(result, Err(AppError::EmailTaken)));
        assert_eq!(store.user_count().await, 1);
    }
}
