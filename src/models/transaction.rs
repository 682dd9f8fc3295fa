//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a completed transfer
//! - `SentTransaction` / `ReceivedTransaction`: a transaction with its counterparty embedded
//! - `TransferRequest`: Request body for `POST /transactions`
//! - `TransactionsResponse`: Response body for `GET /transactions`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Rows are append-only; a transaction is
/// written in the same database transaction as the two balance updates it
/// describes.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,

    /// Amount moved from sender to recipient
    ///
    /// Must be positive (enforced by CHECK constraint)
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub sender_id: i64,

    /// Never equal to `sender_id` (enforced by CHECK constraint)
    pub recipient_id: i64,

    pub created_at: DateTime<Utc>,
}

/// The other side of a transaction, as shown to the current user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Counterparty {
    pub id: i64,
    pub email: String,
}

/// A transaction sent by the current user, embedding the recipient.
///
/// This is also the response body of a successful transfer.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 12,
///   "amount": 25.0,
///   "senderId": 1,
///   "recipientId": 2,
///   "createdAt": "2025-12-21T16:00:00Z",
///   "recipient": { "id": 2, "email": "bob@example.com" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SentTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    pub recipient: Counterparty,
}

/// A transaction received by the current user, embedding the sender.
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    pub sender: Counterparty,
}

/// Request to transfer money to another user.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 25.5,
///   "recipientId": 2
/// }
/// ```
///
/// The sender is always the authenticated user. Both fields stay raw JSON so
/// that type errors are collected alongside the business-rule errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub amount: Option<Value>,

    #[serde(default)]
    pub recipient_id: Option<Value>,
}

/// Response body for `GET /transactions`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub sent_transactions: Vec<SentTransaction>,
    pub received_transactions: Vec<ReceivedTransaction>,
}
