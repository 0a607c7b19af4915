/// SQLite connection pool
///
/// The application persists everything in a single SQLite file. The
/// file is created on first startup if it does not exist.
///
/// # Example
///
/// ```no_run
/// use uzduotys_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `sqlite::memory:` for tests
    pub path: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Creates a connection pool for the configured database file
///
/// The database file is created if missing and foreign key enforcement
/// is switched on for every connection.
///
/// # Errors
///
/// Returns an error if the path is invalid or the database cannot be
/// opened.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(path = %config.path, "opening database");

    let options = if config.path.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(&config.path)?
    } else {
        SqliteConnectOptions::new().filename(&config.path)
    }
    .create_if_missing(true)
    .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Creates a single-connection in-memory pool for tests
///
/// A single connection is required so the schema survives between
/// statements; each in-memory connection is its own database.
pub async fn create_test_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}
