//! Database repository for user management operations.
//!
//! Provides persistence operations for the credential store: registered
//! users with their hashed passwords.

use crate::database::models::{CreateUser, User};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Checks if an email already exists in the system.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Replaces the stored password hash for a user.
    ///
    /// Returns `true` if a user row was updated.
    pub async fn update_password_hash(&self, id: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use uuid::Uuid;

    fn sample_user(email: &str) -> CreateUser {
        CreateUser {
            id: Uuid::now_v7().to_string(),
            username: "tester".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_round_trip() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let created = repo.create_user(sample_user("a@example.com")).await.unwrap();

        let by_id = repo.get_user_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");

        let by_email = repo
            .get_user_by_email("a@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(repo.email_exists("a@example.com").await.unwrap());
        assert!(!repo.email_exists("b@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_violates_unique_constraint() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create_user(sample_user("dup@example.com"))
            .await
            .unwrap();
        assert!(repo.create_user(sample_user("dup@example.com")).await.is_err());
    }

    #[tokio::test]
    async fn password_hash_update_targets_one_user() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let user = repo.create_user(sample_user("pw@example.com")).await.unwrap();

        assert!(repo.update_password_hash(&user.id, "new-hash").await.unwrap());
        let reloaded = repo.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new-hash");

        assert!(!repo.update_password_hash("missing", "x").await.unwrap());
    }
}
