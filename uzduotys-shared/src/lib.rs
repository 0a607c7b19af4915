//! # Uzduotys Shared Library
//!
//! Shared types and business logic for the uzduotys to-do application,
//! used by the HTTP server in `uzduotys-api`.
//!
//! ## Module Organization
//!
//! - `models`: Database models and store operations (users, tasks)
//! - `auth`: Password hashing and signed-token primitives
//! - `db`: Connection pool and embedded migrations
//! - `mail`: Outbound mail capability (SMTP or logging stub)

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;

/// Current version of the uzduotys shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
