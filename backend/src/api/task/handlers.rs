//! Handler functions for vocabulary flashcard API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::database::models::{CreateTask, DeleteTask, Task, UpdateTask};
use crate::errors::ServiceError;
use crate::repositories::task_repository::TaskRepository;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// List all flashcards owned by the authenticated user
#[axum::debug_handler]
pub async fn list_tasks(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, (StatusCode, String)> {
    let repo = TaskRepository::new(&pool);
    let tasks = repo
        .list(claims.user_id())
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(ApiResponse::success(
        tasks,
        "Tasks retrieved successfully",
    )))
}

/// Create a flashcard owned by the authenticated user
#[axum::debug_handler]
pub async fn create_task(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTask>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Task>>), (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = TaskRepository::new(&pool);
    let task = repo
        .create(claims.user_id(), payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(task, "Task created successfully")),
    ))
}

/// Update a flashcard; the match is scoped to the authenticated owner
#[axum::debug_handler]
pub async fn update_task(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let task_id = payload.task_id.clone();
    let repo = TaskRepository::new(&pool);
    let task = repo
        .update(claims.user_id(), payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| service_error_to_http(ServiceError::not_found("Task", &task_id)))?;

    Ok(ResponseJson(ApiResponse::success(
        task,
        "Task updated successfully",
    )))
}

/// Delete a flashcard; idempotent for ids that are already gone
#[axum::debug_handler]
pub async fn delete_task(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<DeleteTask>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = TaskRepository::new(&pool);
    repo.delete(claims.user_id(), &payload.task_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(ApiResponse::success(
        (),
        "Task deleted successfully",
    )))
}
