//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `TOKEN_SECRET` (required): HMAC key used to sign bearer tokens
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 5678
/// - `TOKEN_TTL_SECS` (optional): token lifetime, defaults to 7 days
/// - `STARTING_BALANCE` (optional): balance given to new users, defaults to 100
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `ARGON2_MEMORY_KIB` / `ARGON2_ITERATIONS` (optional): password hashing cost
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    pub token_secret: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    #[serde(default = "default_starting_balance")]
    pub starting_balance: Decimal,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    5678
}

fn default_token_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

fn default_starting_balance() -> Decimal {
    Decimal::new(100, 0)
}

fn default_max_connections() -> u32 {
    5
}

// OWASP minimums for Argon2id.
fn default_argon2_memory_kib() -> u32 {
    19_456
}

fn default_argon2_iterations() -> u32 {
    2
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL, TOKEN_SECRET)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Token lifetime, or `None` if `TOKEN_TTL_SECS` is not positive or exceeds ten years.
    pub fn token_ttl(&self) -> Option<Duration> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return None;
        }
        Duration::try_seconds(self.token_ttl_secs)
    }
}
