//! PostgreSQL pool and the embedded `users` / `transactions` schema.

use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

/// Connect to PostgreSQL with at most `max_connections` open connections.
///
/// Each transfer holds one connection for the whole of its locking database
/// transaction, so the pool size caps how many transfers run at once.
///
/// # Errors
///
/// Fails if the URL is malformed or the server refuses the connection.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the `migrations/` files embedded at compile time.
///
/// Already-applied files are skipped, and sqlx serializes concurrent runs
/// behind an advisory lock, so every instance can call this on startup.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
