//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle token signing, password hashing and transfer validation.

pub mod password_service;
pub mod token_service;
pub mod transfer_service;
