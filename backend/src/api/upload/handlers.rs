//! Handler for proxying file uploads to the object-storage collaborator.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::config::Config;
use crate::errors::ServiceError;
use crate::services::storage_service::{StorageService, UploadedObject};
use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    response::Json as ResponseJson,
};

/// Accept a multipart `file` field and store it, returning its locator
#[axum::debug_handler]
pub async fn upload_file(
    Extension(config): Extension<Config>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<UploadedObject>>, (StatusCode, String)> {
    let storage_service = StorageService::from_config(&config).map_err(service_error_to_http)?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        service_error_to_http(ServiceError::validation(format!(
            "Invalid multipart body: {}",
            e
        )))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            service_error_to_http(ServiceError::upload(format!(
                "Failed to read file bytes: {}",
                e
            )))
        })?;

        let object = storage_service
            .upload(&file_name, &content_type, bytes.to_vec())
            .await
            .map_err(service_error_to_http)?;

        return Ok(ResponseJson(ApiResponse::success(
            object,
            "File uploaded successfully",
        )));
    }

    Err(service_error_to_http(ServiceError::validation(
        "No file provided",
    )))
}
