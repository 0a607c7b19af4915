/// Database access layer
///
/// - [`pool`]: SQLite connection pool creation
/// - [`migrations`]: embedded schema migrations

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, DatabaseConfig};
