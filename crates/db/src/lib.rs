//! SQLite persistence for the setup cache and history.
//!
//! - [`repositories`] - zero-sized repositories with async methods taking
//!   `&SqlitePool` (or any executor, where a transaction needs them).
//! - [`store`] - the stores the pipeline talks to; they wrap the
//!   repositories and publish a change event after every committed write.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use store::{HistoryStore, SetupStore};

pub type DbPool = sqlx::SqlitePool;

/// Connections kept by a file-backed pool.
const MAX_CONNECTIONS: u32 = 5;

/// Create a connection pool from a database URL.
///
/// File databases are created on first use and run in WAL mode so readers
/// are not blocked by the background writer. An in-memory URL gets a
/// single connection that is never recycled, since every SQLite
/// connection would otherwise see its own empty database.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    if database_url.contains(":memory:") {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options.journal_mode(SqliteJournalMode::Wal))
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
