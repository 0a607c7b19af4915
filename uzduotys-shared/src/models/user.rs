/// User model and store operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL UNIQUE,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL
/// );
/// ```
///
/// Usernames and emails are compared exactly as stored: no case folding
/// and no whitespace trimming. Accounts are never deleted; the only
/// mutation after creation is replacing the password hash.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::{map_insert_error, StoreError};

/// A user account
///
/// Passwords are stored as Argon2id PHC strings, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Store-assigned id, immutable
    pub id: i64,

    /// Unique across all users
    pub username: String,

    /// Unique across all users
    pub email: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the username or email is
    /// already taken. The unique constraints make the check-and-insert
    /// atomic; two concurrent registrations with the same identity
    /// cannot both succeed.
    pub async fn create(pool: &SqlitePool, data: NewUser) -> Result<Self, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await
        .map_err(map_insert_error)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (exact match)
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (exact match)
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replaces the stored password hash
    ///
    /// Used by the password-reset flow, the only mutation a user record
    /// sees after creation.
    pub async fn update_password_hash(
        pool: &SqlitePool,
        id: i64,
        new_hash: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(new_hash)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations::run_migrations, pool::create_test_pool};
    use crate::models::DuplicateField;

    async fn test_pool() -> SqlitePool {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn alice() -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;

        let user = User::create(&pool, alice()).await.unwrap();
        assert!(user.id > 0);

        let by_id = User::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        let by_name = User::find_by_username(&pool, "alice").await.unwrap();
        assert_eq!(by_name.unwrap().id, user.id);

        let by_email = User::find_by_email(&pool, "a@x.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_fails() {
        let pool = test_pool().await;
        User::create(&pool, alice()).await.unwrap();

        let result = User::create(
            &pool,
            NewUser {
                username: "alice".to_string(),
                email: "b@x.com".to_string(),
                password_hash: "hash2".to_string(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(StoreError::Duplicate(DuplicateField::Username))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_fails() {
        let pool = test_pool().await;
        User::create(&pool, alice()).await.unwrap();

        let result = User::create(
            &pool,
            NewUser {
                username: "bob".to_string(),
                email: "a@x.com".to_string(),
                password_hash: "hash2".to_string(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(StoreError::Duplicate(DuplicateField::Email))
        ));
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let pool = test_pool().await;
        User::create(&pool, alice()).await.unwrap();

        // No case normalization: "Alice" is a different username
        let found = User::find_by_username(&pool, "Alice").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let pool = test_pool().await;
        let user = User::create(&pool, alice()).await.unwrap();

        User::update_password_hash(&pool, user.id, "$argon2id$new")
            .await
            .unwrap();

        let reloaded = User::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "$argon2id$new");
    }

    #[tokio::test]
    async fn test_update_password_hash_missing_user() {
        let pool = test_pool().await;
        let result = User::update_password_hash(&pool, 9999, "hash").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
