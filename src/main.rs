//! Peer Transfer Service - Main Application Entry Point
//!
//! This is a REST API server for a peer-to-peer money-transfer application.
//! Users sign up, sign in and send balance to each other; every protected
//! request carries a signed bearer token.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries), behind the `Store` trait
//! - **Authentication**: HMAC-SHA256 signed tokens, Argon2id password hashes
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build token and password services
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

mod app;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod store;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::{
    app::AppState,
    services::{password_service::PasswordService, token_service::TokenService},
    store::postgres::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    anyhow::ensure!(
        !config.token_secret.is_empty(),
        "TOKEN_SECRET must not be empty"
    );
    anyhow::ensure!(
        config.token_ttl_secs > 0,
        "TOKEN_TTL_SECS must be a positive number of seconds"
    );
    let ttl = config.token_ttl().with_context(|| {
        format!(
            "TOKEN_TTL_SECS must not exceed {}",
            config::MAX_TOKEN_TTL_SECS
        )
    })?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let tokens = TokenService::new(config.token_secret.as_bytes(), ttl)
        .map_err(|e| anyhow::anyhow!("Invalid token secret: {e}"))?;
    let passwords = PasswordService::new(config.argon2_memory_kib, config.argon2_iterations)
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {e}"))?;

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        tokens,
        passwords,
        starting_balance: config.starting_balance,
    };

    let app = app::router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
