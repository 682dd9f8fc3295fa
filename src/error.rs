//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::token_service::IssueError;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and to the list of
/// messages returned to the client.
///
/// # Error Categories
///
/// - **Validation Errors**: missing or wrongly typed fields, transfer rule violations
/// - **Business Errors**: duplicate email, insufficient funds, unknown recipient
/// - **Authentication Errors**: missing/invalid token, bad credentials
/// - **Internal Errors**: database, hashing task or serialization failures
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Returns HTTP 500; the underlying error is logged, never sent to the client.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A token could not be issued (claims encoding or expiry overflow).
    #[error("Token issuance failed: {0}")]
    TokenIssue(#[from] IssueError),

    /// Any other server-side failure (e.g., a panicked hashing task).
    #[error("Internal error: {0}")]
    Internal(String),

    /// One or more request fields are missing or invalid.
    ///
    /// Returns HTTP 400 with every message in the list.
    #[error("Invalid request")]
    Validation(Vec<String>),

    #[error("Email already exists.")]
    EmailTaken,

    /// Unknown email or wrong password. The two cases are deliberately indistinguishable.
    #[error("Username/password invalid.")]
    InvalidCredentials,

    /// `/validate` was called without a token.
    #[error("Token not provided.")]
    TokenNotProvided,

    /// `/validate` was called with a token that does not resolve to a user.
    #[error("Token invalid.")]
    TokenInvalid,

    /// Protected route was called without a token. Returns HTTP 401.
    #[error("No token provided.")]
    MissingToken,

    /// Protected route was called with a token that does not resolve to a user. Returns HTTP 401.
    #[error("Invalid token provided.")]
    InvalidToken,

    /// Sender's locked balance is below the transfer amount.
    #[error("You don't have enough money for this transaction.")]
    InsufficientBalance,

    #[error("Recipient does not exist.")]
    RecipientNotFound,
}

/// Malformed JSON bodies are reported in the same `{errors}` shape as every other failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "errors": ["Human-readable error message", "..."]
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `MissingToken`, `InvalidToken` → 401 Unauthorized
/// - `Database`, `TokenIssue`, `Internal` → 500 Internal Server Error (hides details from client)
/// - everything else → 400 Bad Request
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            AppError::Database(_) | AppError::TokenIssue(_) | AppError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["An internal error occurred".to_string()],
                )
            }
            AppError::Validation(ref errors) => (StatusCode::BAD_REQUEST, errors.clone()),
            AppError::MissingToken | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, vec![self.to_string()])
            }
            AppError::EmailTaken
            | AppError::InvalidCredentials
            | AppError::TokenNotProvided
            | AppError::TokenInvalid
            | AppError::InsufficientBalance
            | AppError::RecipientNotFound => (StatusCode::BAD_REQUEST, vec![self.to_string()]),
        };

        (status, Json(json!({ "errors": errors }))).into_response()
    }
}
