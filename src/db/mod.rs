//! Database module for SQLite persistence
//!
//! Holds documents, their invite lists and comments.

mod schema;

pub use schema::*;

use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::Result;

/// Create a new database connection pool
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    // Every in-memory connection is its own database, so keep exactly one alive
    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    // Run migrations
    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Current time as stored in `created_at` columns.
///
/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Fresh single-connection in-memory database
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    create_pool("sqlite::memory:").await.unwrap()
}
