//! Database repository for monthly learning-journal operations.
//!
//! Posts are embedded in their parent journal as a JSON array column. Post
//! mutations are a read-modify-write of that array; the read and the write
//! run inside one transaction so concurrent edits of the same journal cannot
//! lose an update.

use crate::database::models::{
    CreateJournal, CreatePost, JournalStats, MonthlyJournal, Post, UpdateJournal, UpdatePost,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

const JOURNAL_COLUMNS: &str = "id, owner_id, month, year, title, summary, ai_generated, \
                               posts, stats, images, is_favorite, created_at, updated_at";

#[derive(Debug, FromRow)]
struct JournalRow {
    id: String,
    owner_id: String,
    month: i64,
    year: i64,
    title: String,
    summary: String,
    ai_generated: bool,
    posts: String,
    stats: String,
    images: String,
    is_favorite: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JournalRow {
    fn into_journal(self) -> Result<MonthlyJournal> {
        let posts = serde_json::from_str(&self.posts).context("invalid posts column")?;
        let stats = serde_json::from_str(&self.stats).context("invalid stats column")?;
        let images = serde_json::from_str(&self.images).context("invalid images column")?;
        Ok(MonthlyJournal {
            id: self.id,
            owner_id: self.owner_id,
            month: self.month,
            year: self.year,
            title: self.title,
            summary: self.summary,
            ai_generated: self.ai_generated,
            posts,
            stats,
            images,
            is_favorite: self.is_favorite,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Result of a post mutation inside a journal.
#[derive(Debug)]
pub enum PostWriteOutcome {
    Updated(MonthlyJournal),
    JournalMissing,
    PostMissing,
}

fn materialize_post(post: CreatePost) -> Post {
    Post {
        id: Uuid::now_v7().to_string(),
        title: post.title,
        description: post.description,
        content: post.content,
        category: post.category,
        difficulty: post.difficulty,
        tags: post.tags,
        created_at: Utc::now(),
    }
}

fn apply_post_update(post: &mut Post, update: UpdatePost) {
    if let Some(title) = update.title {
        post.title = title;
    }
    if let Some(description) = update.description {
        post.description = description;
    }
    if let Some(content) = update.content {
        post.content = content;
    }
    if let Some(category) = update.category {
        post.category = category;
    }
    if let Some(difficulty) = update.difficulty {
        post.difficulty = difficulty;
    }
    if let Some(tags) = update.tags {
        post.tags = tags;
    }
}

pub struct JournalRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JournalRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the owner's journals, most recent (year, month) first.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<MonthlyJournal>> {
        let rows = sqlx::query_as::<_, JournalRow>(&format!(
            "SELECT {JOURNAL_COLUMNS} FROM journals \
             WHERE owner_id = ? ORDER BY year DESC, month DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(JournalRow::into_journal).collect()
    }

    /// Checks whether the owner already has a journal for the given month.
    pub async fn exists_for_month(&self, owner_id: &str, month: i64, year: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM journals WHERE owner_id = ? AND month = ? AND year = ?",
        )
        .bind(owner_id)
        .bind(month)
        .bind(year)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn create(
        &self,
        owner_id: &str,
        journal: CreateJournal,
    ) -> Result<MonthlyJournal> {
        let now = Utc::now();
        let posts: Vec<Post> = journal.posts.into_iter().map(materialize_post).collect();

        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "INSERT INTO journals (id, owner_id, month, year, title, summary, ai_generated, \
             posts, stats, images, is_favorite, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {JOURNAL_COLUMNS}"
        ))
        .bind(Uuid::now_v7().to_string())
        .bind(owner_id)
        .bind(journal.month)
        .bind(journal.year)
        .bind(journal.title)
        .bind(journal.summary)
        .bind(journal.ai_generated)
        .bind(serde_json::to_string(&posts)?)
        .bind(serde_json::to_string(&JournalStats::default())?)
        .bind("[]")
        .bind(false)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        row.into_journal()
    }

    /// Merges the provided fields into the journal matching {id, owner_id}.
    pub async fn update(
        &self,
        owner_id: &str,
        journal_id: &str,
        update: UpdateJournal,
    ) -> Result<Option<MonthlyJournal>> {
        let posts = update
            .posts
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let stats = update
            .stats
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "UPDATE journals \
             SET title = COALESCE(?, title), \
                 summary = COALESCE(?, summary), \
                 posts = COALESCE(?, posts), \
                 is_favorite = COALESCE(?, is_favorite), \
                 stats = COALESCE(?, stats), \
                 updated_at = ? \
             WHERE id = ? AND owner_id = ? \
             RETURNING {JOURNAL_COLUMNS}"
        ))
        .bind(update.title)
        .bind(update.summary)
        .bind(posts)
        .bind(update.is_favorite)
        .bind(stats)
        .bind(Utc::now())
        .bind(journal_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(JournalRow::into_journal).transpose()
    }

    /// Deletes the journal matching {id, owner_id}.
    ///
    /// Returns the number of rows removed; callers translate zero into a
    /// not-found response.
    pub async fn delete(&self, owner_id: &str, journal_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM journals WHERE id = ? AND owner_id = ?")
            .bind(journal_id)
            .bind(owner_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Appends a post to the journal's embedded post list.
    ///
    /// Returns `None` when the journal does not exist for this owner.
    pub async fn add_post(
        &self,
        owner_id: &str,
        journal_id: &str,
        post: CreatePost,
    ) -> Result<Option<MonthlyJournal>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "SELECT {JOURNAL_COLUMNS} FROM journals WHERE id = ? AND owner_id = ?"
        ))
        .bind(journal_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut journal = row.into_journal()?;
        journal.posts.push(materialize_post(post));

        let updated = Self::write_posts(&mut tx, owner_id, journal_id, &journal.posts).await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    /// Merges fields into one embedded post, identified by its id.
    pub async fn update_post(
        &self,
        owner_id: &str,
        journal_id: &str,
        post_id: &str,
        update: UpdatePost,
    ) -> Result<PostWriteOutcome> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "SELECT {JOURNAL_COLUMNS} FROM journals WHERE id = ? AND owner_id = ?"
        ))
        .bind(journal_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(PostWriteOutcome::JournalMissing);
        };
        let mut journal = row.into_journal()?;

        let Some(post) = journal.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(PostWriteOutcome::PostMissing);
        };
        apply_post_update(post, update);

        let updated = Self::write_posts(&mut tx, owner_id, journal_id, &journal.posts).await?;
        tx.commit().await?;

        Ok(PostWriteOutcome::Updated(updated))
    }

    /// Removes one embedded post. Removing an id that is not present leaves
    /// the journal unchanged, mirroring the array-filter semantics of the
    /// post list.
    pub async fn delete_post(
        &self,
        owner_id: &str,
        journal_id: &str,
        post_id: &str,
    ) -> Result<Option<MonthlyJournal>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "SELECT {JOURNAL_COLUMNS} FROM journals WHERE id = ? AND owner_id = ?"
        ))
        .bind(journal_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut journal = row.into_journal()?;
        journal.posts.retain(|p| p.id != post_id);

        let updated = Self::write_posts(&mut tx, owner_id, journal_id, &journal.posts).await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    /// Persists a generated summary and marks the journal as AI-generated.
    pub async fn set_summary(
        &self,
        owner_id: &str,
        journal_id: &str,
        summary: &str,
    ) -> Result<Option<MonthlyJournal>> {
        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "UPDATE journals SET summary = ?, ai_generated = 1, updated_at = ? \
             WHERE id = ? AND owner_id = ? \
             RETURNING {JOURNAL_COLUMNS}"
        ))
        .bind(summary)
        .bind(Utc::now())
        .bind(journal_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(JournalRow::into_journal).transpose()
    }

    async fn write_posts(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        owner_id: &str,
        journal_id: &str,
        posts: &[Post],
    ) -> Result<MonthlyJournal> {
        let row = sqlx::query_as::<_, JournalRow>(&format!(
            "UPDATE journals SET posts = ?, updated_at = ? \
             WHERE id = ? AND owner_id = ? \
             RETURNING {JOURNAL_COLUMNS}"
        ))
        .bind(serde_json::to_string(posts)?)
        .bind(Utc::now())
        .bind(journal_id)
        .bind(owner_id)
        .fetch_one(&mut **tx)
        .await?;

        row.into_journal()
    }
}
