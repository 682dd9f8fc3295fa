//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing a registered user
//! - `UserProfile`: A user together with their sent and received transactions
//! - `CredentialsRequest`: Request body shared by sign-up and sign-in
//! - `AuthResponse`: `{user, token}` response body

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::transaction::{ReceivedTransaction, SentTransaction};

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Each user:
/// - Has a unique, system-assigned integer id and a unique email
/// - Stores an Argon2 PHC string instead of the password
/// - Has a fixed-point balance with two fractional digits
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    pub email: String,

    /// Argon2 hash of the password. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Current balance
    ///
    /// Must be >= 0 (enforced by database CHECK constraint).
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,

    pub created_at: DateTime<Utc>,
}

/// A user with their full ledger, as returned by sign-in and token validation.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "email": "alice@example.com",
///   "balance": 75.5,
///   "createdAt": "2025-12-20T10:00:00Z",
///   "sentTransactions": [
///     { "id": 3, "amount": 24.5, "senderId": 1, "recipientId": 2,
///       "createdAt": "2025-12-21T16:00:00Z",
///       "recipient": { "id": 2, "email": "bob@example.com" } }
///   ],
///   "receivedTransactions": []
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,

    pub sent_transactions: Vec<SentTransaction>,

    pub received_transactions: Vec<ReceivedTransaction>,
}

/// Request body for `POST /sign-up` and `POST /sign-in`.
///
/// Fields are kept as raw JSON values so that a missing field and a field of
/// the wrong type are both reported as validation messages rather than as a
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<Value>,

    #[serde(default)]
    pub password: Option<Value>,
}

/// Validated email and password.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl CredentialsRequest {
    /// Check that both fields are strings, reporting every problem at once.
    pub fn validate(self) -> Result<Credentials, Vec<String>> {
        let mut errors = Vec::new();

        let email = match self.email {
            Some(Value::String(email)) => Some(email),
            _ => {
                errors.push("Email missing or not a string".to_string());
                None
            }
        };

        let password = match self.password {
            Some(Value::String(password)) => Some(password),
            _ => {
                errors.push("Password missing or not a string".to_string());
                None
            }
        };

        match (email, password) {
            (Some(email), Some(password)) => Ok(Credentials { email, password }),
            _ => Err(errors),
        }
    }
}

/// Response body for sign-up, sign-in and token validation.
#[derive(Debug, Serialize)]
pub struct AuthResponse<U> {
    pub user: U,
    pub token: String,
}
