//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - GET /transactions - List the caller's sent and received transactions
//! - POST /transactions - Send money to another user
//!
//! Both routes sit behind the auth middleware.

use crate::{
    app::AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::transaction::{SentTransaction, TransactionsResponse, TransferRequest},
    services::transfer_service,
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};

/// List the authenticated user's transactions.
///
/// # Response (200)
///
/// ```json
/// {
///   "sentTransactions": [
///     { "id": 1, "amount": 25.0, "senderId": 1, "recipientId": 2,
///       "createdAt": "2025-12-21T16:00:00Z",
///       "recipient": { "id": 2, "email": "bob@example.com" } }
///   ],
///   "receivedTransactions": []
/// }
/// ```
///
/// Lists are unfiltered and unpaginated, in insertion order.
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let sent_transactions = state.store.sent_transactions(auth.user.id).await?;
    let received_transactions = state.store.received_transactions(auth.user.id).await?;

    Ok(Json(TransactionsResponse {
        sent_transactions,
        received_transactions,
    }))
}

/// Transfer money from the authenticated user to another user.
///
/// # Request Body
///
/// ```json
/// {
///   "amount": 25.5,
///   "recipientId": 2
/// }
/// ```
///
/// # Atomicity
///
/// The debit, the credit and the ledger row are written in a single store
/// transaction. Either all three persist or none do.
///
/// # Response
///
/// - **Success (200 OK)**: the created transaction with `recipient {id, email}` embedded
/// - **Error (400)**: every failed validation check, listed together
/// - **Error (401)**: missing or invalid token
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<SentTransaction>, AppError> {
    let Json(request) = payload?;

    let transaction =
        transfer_service::execute_transfer(state.store.as_ref(), &auth.user, request).await?;

    Ok(Json(transaction))
}
