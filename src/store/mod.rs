//! Credential store: persistence for users and their ledger.
//!
//! Handlers never talk to the database directly. They receive an
//! `Arc<dyn Store>` through the application state, which lets the router run
//! against PostgreSQL in production and against an in-memory double in tests.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::{
        transaction::{ReceivedTransaction, SentTransaction},
        user::User,
    },
};

/// PostgreSQL implementation
pub mod postgres;

#[cfg(test)]
pub mod memory;

/// Operations the handlers need from the persistence layer.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// - `EmailTaken`: another user already owns `email`
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        balance: Decimal,
    ) -> Result<User, AppError>;

    /// Transactions sent by `user_id`, in insertion order.
    async fn sent_transactions(&self, user_id: i64) -> Result<Vec<SentTransaction>, AppError>;

    /// Transactions received by `user_id`, in insertion order.
    async fn received_transactions(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReceivedTransaction>, AppError>;

    /// Debit the sender, credit the recipient and record the ledger entry as one unit.
    ///
    /// Implementations must serialize concurrent transfers touching the same
    /// user and re-check the sender balance after acquiring that
    /// serialization, so that two racing transfers cannot both spend the same
    /// funds.
    ///
    /// # Errors
    ///
    /// - `InsufficientBalance`: sender balance is below `amount`
    /// - `RecipientNotFound`: recipient does not exist
    /// - `InvalidToken`: sender no longer exists
    async fn transfer(
        &self,
        sender_id: i64,
        recipient_id: i64,
        amount: Decimal,
    ) -> Result<SentTransaction, AppError>;

    /// Round-trip to the backing store, used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
