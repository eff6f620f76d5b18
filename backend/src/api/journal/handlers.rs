//! Handler functions for monthly journal API endpoints.
//!
//! Covers the journal collection itself, the embedded post list, and the
//! AI summarization of a month's posts.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::config::Config;
use crate::database::models::{
    AddPostRequest, CreateJournal, MonthlyJournal, Post, UpdateJournal, UpdatePostRequest,
};
use crate::errors::ServiceError;
use crate::repositories::journal_repository::{JournalRepository, PostWriteOutcome};
use crate::services::summary_service::SummaryService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct JournalIdQuery {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostIdQuery {
    pub month_id: String,
    pub post_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    #[validate(length(min = 1, message = "Month ID is required"))]
    pub month_id: String,

    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    pub summary: String,
    pub journal: MonthlyJournal,
}

/// List the authenticated user's journals, most recent month first
#[axum::debug_handler]
pub async fn list_journals(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<Vec<MonthlyJournal>>>, (StatusCode, String)> {
    let repo = JournalRepository::new(&pool);
    let journals = repo
        .list(claims.user_id())
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(ApiResponse::success(
        journals,
        "Journals retrieved successfully",
    )))
}

/// Create a journal; one journal per (owner, month, year)
#[axum::debug_handler]
pub async fn create_journal(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJournal>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<MonthlyJournal>>), (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = JournalRepository::new(&pool);
    let exists = repo
        .exists_for_month(claims.user_id(), payload.month, payload.year)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;
    if exists {
        return Err(service_error_to_http(ServiceError::already_exists(
            "Journal",
            format!("{}/{}", payload.month, payload.year),
        )));
    }

    let journal = repo
        .create(claims.user_id(), payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(journal, "Journal created successfully")),
    ))
}

/// Update a journal identified by the `id` query parameter
#[axum::debug_handler]
pub async fn update_journal(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<JournalIdQuery>,
    Json(payload): Json<UpdateJournal>,
) -> Result<ResponseJson<ApiResponse<MonthlyJournal>>, (StatusCode, String)> {
    let repo = JournalRepository::new(&pool);
    let journal = repo
        .update(claims.user_id(), &query.id, payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| service_error_to_http(ServiceError::not_found("Journal", &query.id)))?;

    Ok(ResponseJson(ApiResponse::success(
        journal,
        "Journal updated successfully",
    )))
}

/// Delete a journal identified by the `id` query parameter
#[axum::debug_handler]
pub async fn delete_journal(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<JournalIdQuery>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let repo = JournalRepository::new(&pool);
    let removed = repo
        .delete(claims.user_id(), &query.id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    if removed == 0 {
        return Err(service_error_to_http(ServiceError::not_found(
            "Journal", &query.id,
        )));
    }

    Ok(ResponseJson(ApiResponse::success(
        (),
        "Journal deleted successfully",
    )))
}

/// Append a post to a journal's embedded post list
#[axum::debug_handler]
pub async fn add_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddPostRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<MonthlyJournal>>), (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = JournalRepository::new(&pool);
    let journal = repo
        .add_post(claims.user_id(), &payload.month_id, payload.post)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| {
            service_error_to_http(ServiceError::not_found("Journal", &payload.month_id))
        })?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(journal, "Post added successfully")),
    ))
}

/// Update one embedded post
#[axum::debug_handler]
pub async fn update_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<ResponseJson<ApiResponse<MonthlyJournal>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = JournalRepository::new(&pool);
    let outcome = repo
        .update_post(
            claims.user_id(),
            &payload.month_id,
            &payload.post_id,
            payload.updated_post,
        )
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    match outcome {
        PostWriteOutcome::Updated(journal) => Ok(ResponseJson(ApiResponse::success(
            journal,
            "Post updated successfully",
        ))),
        PostWriteOutcome::JournalMissing => Err(service_error_to_http(ServiceError::not_found(
            "Journal",
            &payload.month_id,
        ))),
        PostWriteOutcome::PostMissing => Err(service_error_to_http(ServiceError::not_found(
            "Post",
            &payload.post_id,
        ))),
    }
}

/// Remove one embedded post, identified by query parameters
#[axum::debug_handler]
pub async fn delete_post(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PostIdQuery>,
) -> Result<ResponseJson<ApiResponse<MonthlyJournal>>, (StatusCode, String)> {
    let repo = JournalRepository::new(&pool);
    let journal = repo
        .delete_post(claims.user_id(), &query.month_id, &query.post_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| {
            service_error_to_http(ServiceError::not_found("Journal", &query.month_id))
        })?;

    Ok(ResponseJson(ApiResponse::success(
        journal,
        "Post deleted successfully",
    )))
}

/// Generate and persist an AI summary of the month's posts
#[axum::debug_handler]
pub async fn summarize(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SummarizeRequest>,
) -> Result<ResponseJson<ApiResponse<SummarizeResponse>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let summary_service = SummaryService::from_config(&config).map_err(service_error_to_http)?;
    let summary = summary_service
        .generate_summary(&payload.posts)
        .await
        .map_err(service_error_to_http)?;

    let repo = JournalRepository::new(&pool);
    let journal = repo
        .set_summary(claims.user_id(), &payload.month_id, &summary)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| {
            service_error_to_http(ServiceError::not_found("Journal", &payload.month_id))
        })?;

    Ok(ResponseJson(ApiResponse::success(
        SummarizeResponse { summary, journal },
        "Summary generated successfully",
    )))
}
