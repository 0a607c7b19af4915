/// Database models
///
/// This module contains the two persisted entities and their store
/// operations:
///
/// - `user`: accounts (username, email, password hash)
/// - `task`: to-do items, each owned by exactly one user
///
/// All task reads and writes are owner-scoped: a row that exists but
/// belongs to someone else is indistinguishable from a row that does
/// not exist.

pub mod task;
pub mod user;

pub use task::{NewTask, Task};
pub use user::{NewUser, User};

/// Which unique identity column a failed insert collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
}

impl DuplicateField {
    /// Form field name the collision should be attached to
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::Username => "username",
            DuplicateField::Email => "email",
        }
    }
}

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violation on user identity
    #[error("duplicate {}", .0.as_str())]
    Duplicate(DuplicateField),

    /// Row absent, or present but owned by someone else
    #[error("not found")]
    NotFound,

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Maps a sqlx error to a duplicate-identity error where applicable
///
/// SQLite reports unique violations as
/// `UNIQUE constraint failed: users.username`, so the offending column
/// can be read back out of the message.
pub(crate) fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.username") {
                return StoreError::Duplicate(DuplicateField::Username);
            }
            if message.contains("users.email") {
                return StoreError::Duplicate(DuplicateField::Email);
            }
        }
    }
    StoreError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_names() {
        assert_eq!(DuplicateField::Username.as_str(), "username");
        assert_eq!(DuplicateField::Email.as_str(), "email");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Duplicate(DuplicateField::Email);
        assert_eq!(err.to_string(), "duplicate email");
        assert_eq!(StoreError::NotFound.to_string(), "not found");
    }
}
