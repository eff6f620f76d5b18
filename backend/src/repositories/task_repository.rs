//! Database repository for vocabulary flashcard operations.

use crate::database::models::{CreateTask, Task, UpdateTask};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct TaskRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the owner's flashcards, newest first.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, english, meaning, created_at, updated_at
            FROM tasks
            WHERE owner_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn create(&self, owner_id: &str, task: CreateTask) -> Result<Task> {
        let now = Utc::now();
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, owner_id, english, meaning, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, owner_id, english, meaning, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(owner_id)
        .bind(task.english)
        .bind(task.meaning)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(task)
    }

    /// Merges the provided fields into the task matching {id, owner_id}.
    pub async fn update(&self, owner_id: &str, update: UpdateTask) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET english = COALESCE(?, english),
                meaning = COALESCE(?, meaning),
                updated_at = ?
            WHERE id = ? AND owner_id = ?
            RETURNING id, owner_id, english, meaning, created_at, updated_at
            "#,
        )
        .bind(update.english)
        .bind(update.meaning)
        .bind(Utc::now())
        .bind(update.task_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(task)
    }

    /// Deletes the task matching {id, owner_id}. Idempotent.
    pub async fn delete(&self, owner_id: &str, task_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(task_id)
            .bind(owner_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CreateUser;
    use crate::database::test_pool;
    use crate::repositories::user_repository::UserRepository;

    async fn create_user(pool: &SqlitePool, email: &str) -> String {
        UserRepository::new(pool)
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                username: "tester".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn delete_of_nonexistent_task_is_a_success_with_zero_effect() {
        let pool = test_pool().await;
        let repo = TaskRepository::new(&pool);
        let owner = create_user(&pool, "idem@example.com").await;

        assert_eq!(repo.delete(&owner, "no-such-id").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn flashcards_list_newest_first_and_stay_private() {
        let pool = test_pool().await;
        let repo = TaskRepository::new(&pool);
        let alice = create_user(&pool, "a-tasks@example.com").await;
        let bob = create_user(&pool, "b-tasks@example.com").await;

        for word in ["hund", "katze"] {
            repo.create(
                &alice,
                CreateTask {
                    english: word.to_string(),
                    meaning: "animal".to_string(),
                },
            )
            .await
            .unwrap();
        }

        let words: Vec<String> = repo
            .list(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.english)
            .collect();
        assert_eq!(words, vec!["katze", "hund"]);
        assert!(repo.list(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let pool = test_pool().await;
        let repo = TaskRepository::new(&pool);
        let owner = create_user(&pool, "merge@example.com").await;

        let task = repo
            .create(
                &owner,
                CreateTask {
                    english: "bread".to_string(),
                    meaning: "pain".to_string(),
                },
            )
            .await
            .unwrap();

        let updated = repo
            .update(
                &owner,
                UpdateTask {
                    task_id: task.id,
                    english: None,
                    meaning: Some("le pain".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.english, "bread");
        assert_eq!(updated.meaning, "le pain");
    }
}
