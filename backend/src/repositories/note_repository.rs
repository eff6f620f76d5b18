//! Database repository for note operations.
//!
//! Every query is scoped by the owning user so one user can never read or
//! mutate another user's notes, even with a guessed id.

use crate::database::models::{CreateNote, Note, UpdateNote};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct NoteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NoteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the owner's notes, newest first.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, owner_id, title, content, created_at, updated_at
            FROM notes
            WHERE owner_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(notes)
    }

    pub async fn create(&self, owner_id: &str, note: CreateNote) -> Result<Note> {
        let now = Utc::now();
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, owner_id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, owner_id, title, content, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(owner_id)
        .bind(note.title)
        .bind(note.content)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(note)
    }

    /// Merges the provided fields into the note matching {id, owner_id}.
    ///
    /// Returns `None` when no such note belongs to the caller.
    pub async fn update(&self, owner_id: &str, update: UpdateNote) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                updated_at = ?
            WHERE id = ? AND owner_id = ?
            RETURNING id, owner_id, title, content, created_at, updated_at
            "#,
        )
        .bind(update.title)
        .bind(update.content)
        .bind(Utc::now())
        .bind(update.note_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(note)
    }

    /// Deletes the note matching {id, owner_id}. Idempotent: deleting a
    /// nonexistent id succeeds with zero rows affected.
    pub async fn delete(&self, owner_id: &str, note_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND owner_id = ?")
            .bind(note_id)
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

    fn note(title: &str) -> CreateNote {
        CreateNote {
            title: title.to_string(),
            content: "content".to_string(),
        }
    }

    #[tokio::test]
    async fn notes_are_listed_for_the_owner_only() {
        let pool = test_pool().await;
        let repo = NoteRepository::new(&pool);
        let alice = create_user(&pool, "alice@example.com").await;
        let bob = create_user(&pool, "bob@example.com").await;

        repo.create(&alice, note("x")).await.unwrap();

        let alice_notes = repo.list(&alice).await.unwrap();
        assert_eq!(alice_notes.len(), 1);
        assert_eq!(alice_notes[0].title, "x");

        assert!(repo.list(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let pool = test_pool().await;
        let repo = NoteRepository::new(&pool);
        let owner = create_user(&pool, "order@example.com").await;

        repo.create(&owner, note("first")).await.unwrap();
        repo.create(&owner, note("second")).await.unwrap();
        repo.create(&owner, note("third")).await.unwrap();

        let titles: Vec<String> = repo
            .list(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn update_is_scoped_to_the_owner() {
        let pool = test_pool().await;
        let repo = NoteRepository::new(&pool);
        let alice = create_user(&pool, "alice2@example.com").await;
        let bob = create_user(&pool, "bob2@example.com").await;

        let created = repo.create(&alice, note("mine")).await.unwrap();

        // Bob cannot touch Alice's note by guessing its id.
        let stolen = repo
            .update(
                &bob,
                UpdateNote {
                    note_id: created.id.clone(),
                    title: Some("stolen".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert!(stolen.is_none());

        let updated = repo
            .update(
                &alice,
                UpdateNote {
                    note_id: created.id,
                    title: Some("renamed".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, "content");
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_owner_scoped() {
        let pool = test_pool().await;
        let repo = NoteRepository::new(&pool);
        let alice = create_user(&pool, "alice3@example.com").await;
        let bob = create_user(&pool, "bob3@example.com").await;

        let created = repo.create(&alice, note("gone")).await.unwrap();

        assert_eq!(repo.delete(&bob, &created.id).await.unwrap(), 0);
        assert_eq!(repo.delete(&alice, &created.id).await.unwrap(), 1);
        assert_eq!(repo.delete(&alice, &created.id).await.unwrap(), 0);
    }
}
