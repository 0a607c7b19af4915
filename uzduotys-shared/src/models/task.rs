/// Task model and owner-scoped store operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     done INTEGER NOT NULL DEFAULT 0,
///     owner_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE
/// );
/// ```
///
/// Every operation except `create` takes the acting user's id and is
/// scoped to rows with that `owner_id`. This is the authorization
/// mechanism for tasks: callers cannot tell "no such task" apart from
/// "someone else's task", so task existence never leaks across users.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::StoreError;

/// A to-do item owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Store-assigned id
    pub id: i64,

    /// Task title, required
    pub title: String,

    /// Whether the task is completed
    pub done: bool,

    /// Owning user; tasks are never transferred between owners
    pub owner_id: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub done: bool,
}

impl Task {
    /// Creates a task bound to `owner_id`
    pub async fn create(
        pool: &SqlitePool,
        owner_id: i64,
        data: NewTask,
    ) -> Result<Self, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, done, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, done, owner_id
            "#,
        )
        .bind(data.title)
        .bind(data.done)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists the owner's tasks in insertion (id) order
    pub async fn list_for_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Self>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, done, owner_id
            FROM tasks
            WHERE owner_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds one of the owner's tasks
    ///
    /// Returns `None` both when the task does not exist and when it
    /// belongs to a different owner.
    pub async fn find_for_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, done, owner_id
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates one of the owner's tasks in place
    ///
    /// Concurrent updates to the same row serialize at the database;
    /// the last write wins.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the task is absent or owned by
    /// someone else.
    pub async fn update_for_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
        data: NewTask,
    ) -> Result<Self, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $1, done = $2
            WHERE id = $3 AND owner_id = $4
            RETURNING id, title, done, owner_id
            "#,
        )
        .bind(data.title)
        .bind(data.done)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        task.ok_or(StoreError::NotFound)
    }

    /// Deletes one of the owner's tasks
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the task is absent or owned by
    /// someone else, including a repeat delete of the same id.
    pub async fn delete_for_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
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
    use crate::models::user::{NewUser, User};

    async fn pool_with_users() -> (SqlitePool, User, User) {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let alice = User::create(
            &pool,
            NewUser {
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
                password_hash: "h1".to_string(),
            },
        )
        .await
        .unwrap();

        let bob = User::create(
            &pool,
            NewUser {
                username: "bob".to_string(),
                email: "b@x.com".to_string(),
                password_hash: "h2".to_string(),
            },
        )
        .await
        .unwrap();

        (pool, alice, bob)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            done: false,
        }
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let (pool, alice, _) = pool_with_users().await;

        Task::create(&pool, alice.id, new_task("X")).await.unwrap();

        let tasks = Task::list_for_owner(&pool, alice.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "X");
        assert!(!tasks[0].done);
    }

    #[tokio::test]
    async fn test_list_is_insertion_ordered() {
        let (pool, alice, _) = pool_with_users().await;

        for title in ["first", "second", "third"] {
            Task::create(&pool, alice.id, new_task(title)).await.unwrap();
        }

        let titles: Vec<String> = Task::list_for_owner(&pool, alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_other_owner_sees_nothing() {
        let (pool, alice, bob) = pool_with_users().await;

        let task = Task::create(&pool, alice.id, new_task("Buy milk"))
            .await
            .unwrap();

        // Bob cannot see, edit, or delete Alice's task
        let found = Task::find_for_owner(&pool, task.id, bob.id).await.unwrap();
        assert!(found.is_none());

        let updated = Task::update_for_owner(&pool, task.id, bob.id, new_task("stolen")).await;
        assert!(matches!(updated, Err(StoreError::NotFound)));

        let deleted = Task::delete_for_owner(&pool, task.id, bob.id).await;
        assert!(matches!(deleted, Err(StoreError::NotFound)));

        // And the task is untouched
        let original = Task::find_for_owner(&pool, task.id, alice.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(original.title, "Buy milk");
    }

    #[tokio::test]
    async fn test_update_marks_done() {
        let (pool, alice, _) = pool_with_users().await;
        let task = Task::create(&pool, alice.id, new_task("X")).await.unwrap();

        let updated = Task::update_for_owner(
            &pool,
            task.id,
            alice.id,
            NewTask {
                title: "X".to_string(),
                done: true,
            },
        )
        .await
        .unwrap();
        assert!(updated.done);

        let listed = Task::list_for_owner(&pool, alice.id).await.unwrap();
        assert!(listed[0].done);
    }

    #[tokio::test]
    async fn test_delete_then_repeat_delete() {
        let (pool, alice, _) = pool_with_users().await;
        let task = Task::create(&pool, alice.id, new_task("X")).await.unwrap();

        Task::delete_for_owner(&pool, task.id, alice.id)
            .await
            .unwrap();

        let tasks = Task::list_for_owner(&pool, alice.id).await.unwrap();
        assert!(tasks.is_empty());

        // Deleting the same id again is not-found, not a silent success
        let again = Task::delete_for_owner(&pool, task.id, alice.id).await;
        assert!(matches!(again, Err(StoreError::NotFound)));
    }
}
