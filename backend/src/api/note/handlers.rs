//! Handler functions for note API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::database::models::{CreateNote, DeleteNote, Note, UpdateNote};
use crate::errors::ServiceError;
use crate::repositories::note_repository::NoteRepository;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// List all notes owned by the authenticated user
#[axum::debug_handler]
pub async fn list_notes(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<Vec<Note>>>, (StatusCode, String)> {
    let repo = NoteRepository::new(&pool);
    let notes = repo
        .list(claims.user_id())
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(ApiResponse::success(
        notes,
        "Notes retrieved successfully",
    )))
}

/// Create a note owned by the authenticated user
#[axum::debug_handler]
pub async fn create_note(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateNote>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Note>>), (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = NoteRepository::new(&pool);
    let note = repo
        .create(claims.user_id(), payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(note, "Note created successfully")),
    ))
}

/// Update a note; the match is scoped to the authenticated owner
#[axum::debug_handler]
pub async fn update_note(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateNote>,
) -> Result<ResponseJson<ApiResponse<Note>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let note_id = payload.note_id.clone();
    let repo = NoteRepository::new(&pool);
    let note = repo
        .update(claims.user_id(), payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| service_error_to_http(ServiceError::not_found("Note", &note_id)))?;

    Ok(ResponseJson(ApiResponse::success(
        note,
        "Note updated successfully",
    )))
}

/// Delete a note; idempotent for ids that are already gone
#[axum::debug_handler]
pub async fn delete_note(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<DeleteNote>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = NoteRepository::new(&pool);
    repo.delete(claims.user_id(), &payload.note_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(ApiResponse::success(
        (),
        "Note deleted successfully",
    )))
}
