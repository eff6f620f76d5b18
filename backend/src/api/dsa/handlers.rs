//! Handler functions for algorithm-practice question API endpoints.
//!
//! Update and delete verify that the authenticated caller owns the target
//! question; the match is enforced in the repository query.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::database::models::{
    CreateDsaQuestion, DeleteDsaQuestion, DsaQuestion, UpdateDsaQuestion,
};
use crate::errors::ServiceError;
use crate::repositories::dsa_repository::DsaRepository;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// List the authenticated user's questions, oldest first
#[axum::debug_handler]
pub async fn list_questions(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<Vec<DsaQuestion>>>, (StatusCode, String)> {
    let repo = DsaRepository::new(&pool);
    let questions = repo
        .list(claims.user_id())
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(ApiResponse::success(
        questions,
        "DSA questions retrieved successfully",
    )))
}

/// Create a question owned by the authenticated user
#[axum::debug_handler]
pub async fn create_question(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateDsaQuestion>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<DsaQuestion>>), (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = DsaRepository::new(&pool);
    let question = repo
        .create(claims.user_id(), payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(
            question,
            "DSA question created successfully",
        )),
    ))
}

/// Update a question; the match is scoped to the authenticated owner
#[axum::debug_handler]
pub async fn update_question(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateDsaQuestion>,
) -> Result<ResponseJson<ApiResponse<DsaQuestion>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let dsa_id = payload.dsa_id.clone();
    let repo = DsaRepository::new(&pool);
    let question = repo
        .update(claims.user_id(), payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| service_error_to_http(ServiceError::not_found("DSA question", &dsa_id)))?;

    Ok(ResponseJson(ApiResponse::success(
        question,
        "DSA question updated successfully",
    )))
}

/// Delete a question; idempotent for ids that are already gone
#[axum::debug_handler]
pub async fn delete_question(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<DeleteDsaQuestion>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    payload.validate().map_err(validation_error_response)?;

    let repo = DsaRepository::new(&pool);
    repo.delete(claims.user_id(), &payload.dsa_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(ApiResponse::success(
        (),
        "DSA question deleted successfully",
    )))
}
