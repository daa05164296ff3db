use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    DeleteFileResponseDto, FileLimitsResponseDto, FileListQuery, FileListResponseDto,
    FileResponseDto, FileTextContentResponseDto, UploadFileDto,
};
use crate::features::files::services::{FileContent, FileService};
use crate::shared::constants::DOWNLOAD_CHUNK_SIZE;
use crate::shared::types::ErrorResponse;

/// Upload a file
///
/// Accepts multipart/form-data with a `file` part carrying a filename.
/// The part is streamed straight to disk.
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Form with a single `file` part",
    ),
    responses(
        (status = 200, description = "File uploaded successfully", body = FileResponseDto),
        (status = 400, description = "Missing file part or filename", body = ErrorResponse),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "Request body exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "I/O error while storing the file", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<Json<FileResponseDto>> {
    debug!("File upload request from user: {}", user.username);

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field: {:?}", field.name());
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;
        let provided_content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let declared_size = field
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        info!(
            "File upload details: filename='{}', contentType='{}', size={:?}",
            file_name, provided_content_type, declared_size
        );

        let reader = StreamReader::new(Box::pin(field.map_err(std::io::Error::other)));
        let file = service
            .upload_file(
                user.user_id,
                &file_name,
                &provided_content_type,
                declared_size,
                reader,
            )
            .await
            .map_err(body_limit_exceeded)?;

        return Ok(Json(FileResponseDto::from(file)));
    }

    Err(AppError::BadRequest("Missing form field 'file'".to_string()))
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart field: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge("File too large".to_string());
    }
    AppError::BadRequest(format!("Failed to read multipart data: {}", e))
}

/// The size limit can also trip while the part is being copied to disk,
/// where it arrives wrapped in an I/O error.
fn body_limit_exceeded(err: AppError) -> AppError {
    let too_large = match &err {
        AppError::Io(e) => e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
            .is_some_and(|m| m.status() == StatusCode::PAYLOAD_TOO_LARGE),
        _ => false,
    };

    if too_large {
        AppError::PayloadTooLarge("File too large".to_string())
    } else {
        err
    }
}

/// List the caller's active files, newest first
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(FileListQuery),
    responses(
        (status = 200, description = "One page of files", body = FileListResponseDto),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppQuery(query): AppQuery<FileListQuery>,
) -> Result<Json<FileListResponseDto>> {
    query.validate_paging()?;
    let search = query.search_term();

    info!(
        "Fetching files for userId={} (page={}, size={})",
        user.user_id, query.page, query.page_size
    );

    let files = service
        .get_files_for_user_paginated(user.user_id, query.page, query.page_size, search)
        .await?;
    let total = service.get_total_file_count(user.user_id, search).await?;

    let response = FileListResponseDto::new(files, total, query.page, query.page_size);
    debug!(
        "Returning page {} of {} for userId={}",
        response.page, response.total_pages, user.user_id
    );
    Ok(Json(response))
}

/// Quote a filename for `Content-Disposition`, dropping characters a
/// header value cannot carry
fn attachment_disposition(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", cleaned)
}

/// Download a file's bytes
#[utoipa::path(
    get,
    path = "/files/{id}/download",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "File or its content not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<i64>,
) -> Result<Response> {
    info!("Download requested: fileId={}, user={}", file_id, user.username);

    // Public-owned files are not exempt here; only owner or admin may download
    let visible = service.find_visible_file(file_id).await?;
    if !user.can_access(visible.user_id) {
        warn!(
            "Access denied: user={} tried to download file owned by user={}",
            user.username, visible.user_id
        );
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    let FileContent { file, reader } = service
        .get_file_content(file_id, user.user_id, user.is_admin())
        .await?;

    info!(
        "Streaming file '{}' of size={} bytes",
        file.original_name, file.size
    );

    let stream = ReaderStream::with_capacity(reader, DOWNLOAD_CHUNK_SIZE);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&file.original_name).as_bytes(),
        )
        .header(header::CONTENT_LENGTH, file.size)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}

/// Text extracted from a file by the preview pipeline
#[utoipa::path(
    get,
    path = "/files/{id}/text",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Extracted text", body = FileTextContentResponseDto),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "File or text not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_file_text(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<i64>,
) -> Result<Json<FileTextContentResponseDto>> {
    info!("User {} requested text content for fileId={}", user.username, file_id);

    let text_content = service
        .get_text_content(file_id, user.user_id, user.is_admin())
        .await?;

    Ok(Json(FileTextContentResponseDto { text_content }))
}

/// Soft-delete a file
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = DeleteFileResponseDto),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<i64>,
) -> Result<Json<DeleteFileResponseDto>> {
    info!("User {} requests delete for fileId={}", user.username, file_id);

    let file = service.find_visible_file(file_id).await?;
    if !user.can_access(file.user_id) {
        warn!(
            "Access denied: user={} tried to delete file owned by user={}",
            user.username, file.user_id
        );
        return Err(AppError::Forbidden(
            "You don't have permission to delete this file".to_string(),
        ));
    }

    if !service
        .delete_file(file_id, user.user_id, user.is_admin())
        .await?
    {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    Ok(Json(DeleteFileResponseDto {
        success: true,
        message: "File deleted successfully".to_string(),
    }))
}

/// Upload limits and supported formats
#[utoipa::path(
    get,
    path = "/files/limits",
    tag = "files",
    responses(
        (status = 200, description = "Configured limits", body = FileLimitsResponseDto)
    )
)]
pub async fn get_file_limits(State(service): State<Arc<FileService>>) -> Json<FileLimitsResponseDto> {
    debug!("Getting file limits and supported formats");
    Json(service.limits())
}
