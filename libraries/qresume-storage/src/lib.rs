//! QResume Storage
//!
//! `SQLite` persistence for QResume users.
//!
//! A single `users` table holds credentials, the display name and the
//! embedded profile details (columns prefixed `details_`). Email uniqueness
//! is enforced by the table itself; a duplicate insert surfaces as
//! [`StorageError::Duplicate`].
//!
//! # Example
//!
//! ```rust,no_run
//! use qresume_storage::{connect_with_retry, run_migrations, SqliteUserStore};
//! use qresume_core::UserStore;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect_with_retry("sqlite://qresume.db", 30, Duration::from_secs(3)).await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteUserStore::new(pool);
//! let user = store.get_user_by_email("ada@example.com").await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

pub mod users;

pub use context::SqliteUserStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://qresume.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    // Every connection to `:memory:` opens its own empty database
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create a pool, retrying a fixed number of times before giving up
///
/// Used at startup where the database volume may not be ready yet.
/// `attempts` of zero is treated as one.
///
/// # Errors
///
/// Returns the error of the last attempt
pub async fn connect_with_retry(
    database_url: &str,
    attempts: u32,
    delay: Duration,
) -> Result<SqlitePool, StorageError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match create_pool(database_url).await {
            Ok(pool) => {
                tracing::info!("Connected to database after {} attempt(s)", attempt);
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    "Failed to connect to the database (attempt {}/{}), retrying: {}",
                    attempt,
                    attempts,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to the database after {} attempts: {}",
                    attempts,
                    e
                );
                return Err(StorageError::Connection(e.to_string()));
            }
        }
    }
}
