//! Database repository for algorithm-practice question operations.
//!
//! Tags are persisted as a JSON array column and materialized into
//! `Vec<String>` at the repository boundary.

use crate::database::models::{CreateDsaQuestion, DsaDifficulty, DsaQuestion, UpdateDsaQuestion};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

const DSA_COLUMNS: &str = "id, owner_id, chapter, title, difficulty, problem_statement, \
                           solution, code, code_language, tags, created_at, updated_at";

#[derive(Debug, FromRow)]
struct DsaRow {
    id: String,
    owner_id: String,
    chapter: String,
    title: String,
    difficulty: DsaDifficulty,
    problem_statement: String,
    solution: String,
    code: String,
    code_language: String,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DsaRow {
    fn into_question(self) -> Result<DsaQuestion> {
        let tags = serde_json::from_str(&self.tags).context("invalid tags column")?;
        Ok(DsaQuestion {
            id: self.id,
            owner_id: self.owner_id,
            chapter: self.chapter,
            title: self.title,
            difficulty: self.difficulty,
            problem_statement: self.problem_statement,
            solution: self.solution,
            code: self.code,
            code_language: self.code_language,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub struct DsaRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DsaRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the owner's questions in creation order, oldest first.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<DsaQuestion>> {
        let rows = sqlx::query_as::<_, DsaRow>(&format!(
            "SELECT {DSA_COLUMNS} FROM dsa_questions \
             WHERE owner_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(DsaRow::into_question).collect()
    }

    pub async fn create(
        &self,
        owner_id: &str,
        question: CreateDsaQuestion,
    ) -> Result<DsaQuestion> {
        let now = Utc::now();
        let tags = serde_json::to_string(&question.tags)?;
        let row = sqlx::query_as::<_, DsaRow>(&format!(
            "INSERT INTO dsa_questions (id, owner_id, chapter, title, difficulty, \
             problem_statement, solution, code, code_language, tags, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {DSA_COLUMNS}"
        ))
        .bind(Uuid::now_v7().to_string())
        .bind(owner_id)
        .bind(question.chapter)
        .bind(question.title)
        .bind(question.difficulty)
        .bind(question.problem_statement)
        .bind(question.solution)
        .bind(question.code)
        .bind(question.code_language)
        .bind(tags)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        row.into_question()
    }

    /// Merges the provided fields into the question matching {id, owner_id}.
    pub async fn update(
        &self,
        owner_id: &str,
        update: UpdateDsaQuestion,
    ) -> Result<Option<DsaQuestion>> {
        let tags = update
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let row = sqlx::query_as::<_, DsaRow>(&format!(
            "UPDATE dsa_questions \
             SET chapter = COALESCE(?, chapter), \
                 title = COALESCE(?, title), \
                 difficulty = COALESCE(?, difficulty), \
                 problem_statement = COALESCE(?, problem_statement), \
                 solution = COALESCE(?, solution), \
                 code = COALESCE(?, code), \
                 code_language = COALESCE(?, code_language), \
                 tags = COALESCE(?, tags), \
                 updated_at = ? \
             WHERE id = ? AND owner_id = ? \
             RETURNING {DSA_COLUMNS}"
        ))
        .bind(update.chapter)
        .bind(update.title)
        .bind(update.difficulty)
        .bind(update.problem_statement)
        .bind(update.solution)
        .bind(update.code)
        .bind(update.code_language)
        .bind(tags)
        .bind(Utc::now())
        .bind(update.dsa_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(DsaRow::into_question).transpose()
    }

    /// Deletes the question matching {id, owner_id}. Idempotent.
    pub async fn delete(&self, owner_id: &str, dsa_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM dsa_questions WHERE id = ? AND owner_id = ?")
            .bind(dsa_id)
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

    fn question(title: &str, tags: Vec<&str>) -> CreateDsaQuestion {
        CreateDsaQuestion {
            chapter: "Arrays".to_string(),
            title: title.to_string(),
            difficulty: DsaDifficulty::Easy,
            problem_statement: "statement".to_string(),
            solution: "solution".to_string(),
            code: "fn main() {}".to_string(),
            code_language: "rust".to_string(),
            tags: tags.into_iter().map(String::from).collect(),
        }
    }

    #[tokio::test]
    async fn questions_list_oldest_first_with_tags_intact() {
        let pool = test_pool().await;
        let repo = DsaRepository::new(&pool);
        let owner = create_user(&pool, "dsa@example.com").await;

        repo.create(&owner, question("Two Sum", vec!["hash-map"]))
            .await
            .unwrap();
        repo.create(&owner, question("Three Sum", vec!["two-pointers", "sort"]))
            .await
            .unwrap();

        let questions = repo.list(&owner).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].title, "Two Sum");
        assert_eq!(questions[1].tags, vec!["two-pointers", "sort"]);
    }

    #[tokio::test]
    async fn update_and_delete_require_ownership() {
        let pool = test_pool().await;
        let repo = DsaRepository::new(&pool);
        let alice = create_user(&pool, "a-dsa@example.com").await;
        let bob = create_user(&pool, "b-dsa@example.com").await;

        let created = repo.create(&alice, question("Mine", vec![])).await.unwrap();

        let touched = repo
            .update(
                &bob,
                UpdateDsaQuestion {
                    dsa_id: created.id.clone(),
                    chapter: None,
                    title: Some("Hijacked".to_string()),
                    difficulty: None,
                    problem_statement: None,
                    solution: None,
                    code: None,
                    code_language: None,
                    tags: None,
                },
            )
            .await
            .unwrap();
        assert!(touched.is_none());

        assert_eq!(repo.delete(&bob, &created.id).await.unwrap(), 0);
        assert_eq!(repo.delete(&alice, &created.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn partial_update_keeps_unset_fields() {
        let pool = test_pool().await;
        let repo = DsaRepository::new(&pool);
        let owner = create_user(&pool, "partial-dsa@example.com").await;

        let created = repo
            .create(&owner, question("Binary Search", vec!["search"]))
            .await
            .unwrap();

        let updated = repo
            .update(
                &owner,
                UpdateDsaQuestion {
                    dsa_id: created.id,
                    chapter: None,
                    title: None,
                    difficulty: Some(DsaDifficulty::Hard),
                    problem_statement: None,
                    solution: None,
                    code: None,
                    code_language: None,
                    tags: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.difficulty, DsaDifficulty::Hard);
        assert_eq!(updated.title, "Binary Search");
        assert_eq!(updated.tags, vec!["search"]);
    }
}
