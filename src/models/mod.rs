//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request and response bodies built from them.

/// Ledger entries and transfer request/response types
pub mod transaction;
/// Registered users and credential request/response types
pub mod user;
