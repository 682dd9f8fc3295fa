//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, headers, auth context)
//! 2. Performs business logic through the services and the store
//! 3. Returns HTTP response (JSON, status code)

/// Sign-up, sign-in and token validation
pub mod auth;
/// Service health endpoint
pub mod health;
/// Transfer and transaction listing endpoints
pub mod transactions;
