//! Database operations for the Shoprate `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Identity store (admins, customers, store owners)
//! - `stores` - Store registry
//! - `ratings` - The rating ledger, one row per (user, store) pair
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/server/migrations/` via
//! [`MIGRATOR`] and run at server startup.

pub mod ratings;
pub mod sort;
pub mod stores;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use ratings::{RatingRepository, UpsertOutcome};
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Embedded database migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enabled per connection; the database file is created
/// if it does not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot
/// be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Create a migrated, in-memory pool unique to the calling test.
    ///
    /// Shared-cache mode lets every pool connection see the same database,
    /// which the concurrency tests rely on.
    pub async fn migrated_pool() -> SqlitePool {
        let n = DB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let url = format!("sqlite:file:shoprate_test_{n}?mode=memory&cache=shared");
        let options = SqliteConnectOptions::from_str(&url)
            .expect("valid test database url")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("connect to in-memory database");

        MIGRATOR.run(&pool).await.expect("run migrations");
        pool
    }
}
