//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database, together with the create/update payloads accepted by the
//! API. Owner ids are always stamped from the authenticated session, never
//! taken from a request body, so none of the payload structs carry one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "User ID is required"))]
    pub id: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password hash is required"))]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNote {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNote {
    #[serde(default)]
    #[validate(length(min = 1, message = "Note ID is required"))]
    pub note_id: String,

    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNote {
    #[serde(default)]
    #[validate(length(min = 1, message = "Note ID is required"))]
    pub note_id: String,
}

/// Vocabulary flashcard. The historical name "task" is kept on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub english: String,
    pub meaning: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[serde(default)]
    #[validate(length(min = 1, message = "English word is required"))]
    pub english: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Meaning is required"))]
    pub meaning: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(default)]
    #[validate(length(min = 1, message = "Task ID is required"))]
    pub task_id: String,

    pub english: Option<String>,
    pub meaning: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTask {
    #[serde(default)]
    #[validate(length(min = 1, message = "Task ID is required"))]
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "TEXT")]
pub enum DsaDifficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for DsaDifficulty {
    fn default() -> Self {
        DsaDifficulty::Medium
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaQuestion {
    pub id: String,
    pub owner_id: String,
    pub chapter: String,
    pub title: String,
    pub difficulty: DsaDifficulty,
    pub problem_statement: String,
    pub solution: String,
    pub code: String,
    pub code_language: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDsaQuestion {
    #[serde(default)]
    #[validate(length(min = 1, message = "Chapter is required"))]
    pub chapter: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub difficulty: DsaDifficulty,

    #[serde(default)]
    pub problem_statement: String,

    #[serde(default)]
    pub solution: String,

    #[serde(default)]
    pub code: String,

    #[serde(default = "default_code_language")]
    pub code_language: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_code_language() -> String {
    "javascript".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDsaQuestion {
    #[serde(default)]
    #[validate(length(min = 1, message = "DSA question ID is required"))]
    pub dsa_id: String,

    pub chapter: Option<String>,
    pub title: Option<String>,
    pub difficulty: Option<DsaDifficulty>,
    pub problem_statement: Option<String>,
    pub solution: Option<String>,
    pub code: Option<String>,
    pub code_language: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDsaQuestion {
    #[serde(default)]
    #[validate(length(min = 1, message = "DSA question ID is required"))]
    pub dsa_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PostCategory {
    Learning,
    Project,
    #[serde(rename = "Bug Fix")]
    BugFix,
    Research,
    Implementation,
}

impl Default for PostCategory {
    fn default() -> Self {
        PostCategory::Learning
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PostDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for PostDifficulty {
    fn default() -> Self {
        PostDifficulty::Intermediate
    }
}

/// A journal entry embedded in its parent month's post list. Posts are only
/// ever addressed through the parent journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: PostCategory,
    #[serde(default)]
    pub difficulty: PostDifficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    #[serde(default)]
    #[validate(length(min = 1, message = "Post title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Post description is required"))]
    pub description: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub category: PostCategory,

    #[serde(default)]
    pub difficulty: PostDifficulty,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub category: Option<PostCategory>,
    pub difficulty: Option<PostDifficulty>,
    pub tags: Option<Vec<String>>,
}

/// Free-form monthly counters maintained by the client and persisted opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    #[serde(default)]
    pub total_learnings: i64,
    #[serde(default)]
    pub projects_completed: i64,
    #[serde(default)]
    pub bugs_fixed: i64,
    #[serde(default = "default_average_difficulty")]
    pub average_difficulty: String,
}

fn default_average_difficulty() -> String {
    "Intermediate".to_string()
}

impl Default for JournalStats {
    fn default() -> Self {
        Self {
            total_learnings: 0,
            projects_completed: 0,
            bugs_fixed: 0,
            average_difficulty: default_average_difficulty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyJournal {
    pub id: String,
    pub owner_id: String,
    pub month: i64,
    pub year: i64,
    pub title: String,
    pub summary: String,
    pub ai_generated: bool,
    pub posts: Vec<Post>,
    pub stats: JournalStats,
    pub images: Vec<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournal {
    #[serde(default)]
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i64,

    #[serde(default)]
    #[validate(range(min = 1900, message = "Year is required"))]
    pub year: i64,

    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    #[validate(nested)]
    pub posts: Vec<CreatePost>,

    #[serde(default)]
    pub ai_generated: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJournal {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub posts: Option<Vec<Post>>,
    pub is_favorite: Option<bool>,
    pub stats: Option<JournalStats>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddPostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Month ID is required"))]
    pub month_id: String,

    #[validate(nested)]
    pub post: CreatePost,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Month ID is required"))]
    pub month_id: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Post ID is required"))]
    pub post_id: String,

    #[serde(default)]
    pub updated_post: UpdatePost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_note_fields_fail_validation() {
        let note = CreateNote {
            title: "".to_string(),
            content: "body".to_string(),
        };
        assert!(note.validate().is_err());

        let note = CreateNote {
            title: "t".to_string(),
            content: "".to_string(),
        };
        assert!(note.validate().is_err());

        let note = CreateNote {
            title: "t".to_string(),
            content: "c".to_string(),
        };
        assert!(note.validate().is_ok());
    }

    #[test]
    fn journal_month_must_be_in_range() {
        let journal = CreateJournal {
            month: 13,
            year: 2024,
            title: "June".to_string(),
            summary: String::new(),
            posts: vec![],
            ai_generated: false,
        };
        assert!(journal.validate().is_err());

        let journal = CreateJournal {
            month: 6,
            year: 2024,
            title: "June".to_string(),
            summary: String::new(),
            posts: vec![],
            ai_generated: false,
        };
        assert!(journal.validate().is_ok());
    }

    #[test]
    fn post_category_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&PostCategory::BugFix).unwrap();
        assert_eq!(json, "\"Bug Fix\"");

        let parsed: PostCategory = serde_json::from_str("\"Bug Fix\"").unwrap();
        assert_eq!(parsed, PostCategory::BugFix);
    }

    #[test]
    fn dsa_payload_defaults() {
        let payload: CreateDsaQuestion =
            serde_json::from_str(r#"{"chapter":"Arrays","title":"Two Sum"}"#).unwrap();
        assert_eq!(payload.difficulty, DsaDifficulty::Medium);
        assert_eq!(payload.code_language, "javascript");
        assert!(payload.tags.is_empty());
        assert!(payload.validate().is_ok());
    }
}
