//! Authentication HTTP handlers.
//!
//! This module implements the account-facing endpoints:
//! - POST /sign-up - Register and receive a token
//! - POST /sign-in - Exchange credentials for a token
//! - GET /validate - Exchange a valid token for a fresh one
//!
//! # Error Policy
//!
//! Sign-up and sign-in report all structural errors (missing or non-string
//! fields) together, and stop there; the uniqueness or credential check only
//! runs once the body is well-formed.

use crate::{
    app::AppState,
    error::AppError,
    middleware::auth::{bearer_token, user_for_token},
    models::user::{AuthResponse, CredentialsRequest, User, UserProfile},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};

/// Load a user's sent and received transactions alongside the user.
async fn load_profile(state: &AppState, user: User) -> Result<UserProfile, AppError> {
    let sent_transactions = state.store.sent_transactions(user.id).await?;
    let received_transactions = state.store.received_transactions(user.id).await?;

    Ok(UserProfile {
        user,
        sent_transactions,
        received_transactions,
    })
}

/// Register a new user.
///
/// # Request Body
///
/// ```json
/// {
///   "email": "alice@example.com",
///   "password": "correct horse"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{user, token}`; the user starts with the configured balance
/// - **Error (400)**: structural errors, or "Email already exists."
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthResponse<User>>, AppError> {
    let Json(request) = payload?;
    let credentials = request.validate().map_err(AppError::Validation)?;

    if state
        .store
        .find_user_by_email(&credentials.email)
        .await?
        .is_some()
    {
        return Err(AppError::EmailTaken);
    }

    let password_hash = state.passwords.hash(credentials.password).await?;
    let user = state
        .store
        .create_user(&credentials.email, &password_hash, state.starting_balance)
        .await?;
    let token = state.tokens.issue(user.id)?;

    tracing::info!(user_id = user.id, "User signed up");

    Ok(Json(AuthResponse { user, token }))
}

/// Sign in with email and password.
///
/// # Response
///
/// - **Success (200 OK)**: `{user, token}` with the user's sent and received transactions
/// - **Error (400)**: structural errors, or "Username/password invalid." for
///   both unknown emails and wrong passwords
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthResponse<UserProfile>>, AppError> {
    let Json(request) = payload?;
    let credentials = request.validate().map_err(AppError::Validation)?;

    let user = state
        .store
        .find_user_by_email(&credentials.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let matches = state
        .passwords
        .verify(credentials.password, user.password_hash.clone())
        .await?;
    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    let profile = load_profile(&state, user).await?;

    Ok(Json(AuthResponse {
        user: profile,
        token,
    }))
}

/// Validate the caller's token and rotate it.
///
/// # Response
///
/// - **Success (200 OK)**: `{user, token}` with a newly issued token
/// - **Error (400)**: "Token not provided." or "Token invalid."
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthResponse<UserProfile>>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::TokenNotProvided)?;

    let user = user_for_token(&state, token)
        .await?
        .ok_or(AppError::TokenInvalid)?;

    let token = state.tokens.issue(user.id)?;
    let profile = load_profile(&state, user).await?;

    Ok(Json(AuthResponse {
        user: profile,
        token,
    }))
}
