use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;
use crate::features::files::models::File;
use crate::shared::constants::{BYTES_PER_GB, BYTES_PER_MB, DEFAULT_PAGE_SIZE};
use crate::shared::types::PageMeta;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler streams axum's Multipart field directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// File metadata as returned to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    pub id: i64,
    /// Original filename as uploaded
    pub name: String,
    pub content_type: String,
    /// Size in bytes as stored on disk
    pub size: i64,
    pub upload_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub has_text_content: bool,
}

impl From<File> for FileResponseDto {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            name: file.original_name,
            content_type: file.content_type,
            size: file.size,
            upload_date: file.created_at,
            thumbnail_url: file.thumbnail_url,
            preview_url: file.preview_url,
            has_text_content: file.has_text_content,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query parameters for listing files
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FileListQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Case-insensitive substring of the original filename
    pub search: Option<String>,
}

impl FileListQuery {
    pub fn validate_paging(&self) -> Result<(), AppError> {
        if self.page < 1 || self.page_size < 1 {
            tracing::warn!(
                "Invalid paging parameters: page={}, pageSize={}",
                self.page,
                self.page_size
            );
            return Err(AppError::BadRequest("Invalid paging parameters".to_string()));
        }
        Ok(())
    }

    /// Trimmed search term, `None` when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of a user's active files
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponseDto {
    pub files: Vec<FileResponseDto>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl FileListResponseDto {
    pub fn new(files: Vec<File>, total: i64, page: i64, page_size: i64) -> Self {
        let meta = PageMeta::new(total, page, page_size);
        Self {
            files: files.into_iter().map(FileResponseDto::from).collect(),
            total: meta.total,
            page: meta.page,
            page_size: meta.page_size,
            total_pages: meta.total_pages,
            has_next: meta.has_next,
            has_previous: meta.has_previous,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileTextContentResponseDto {
    pub text_content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    pub success: bool,
    pub message: String,
}

/// Upload limits advertised to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileLimitsResponseDto {
    #[serde(rename = "maxFileSize")]
    pub max_file_size: u64,
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: u64,
    #[serde(rename = "supportedFormats")]
    pub supported_formats: Vec<String>,
    #[serde(rename = "maxStorageBytes")]
    pub max_storage_bytes: u64,
    #[serde(rename = "maxStorageGB")]
    pub max_storage_gb: u64,
}

impl From<&StorageConfig> for FileLimitsResponseDto {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            max_file_size_mb: config.max_file_size_bytes / BYTES_PER_MB,
            supported_formats: config.supported_formats.clone(),
            max_storage_bytes: config.max_storage_bytes,
            max_storage_gb: config.max_storage_bytes / BYTES_PER_GB,
        }
    }
}

/// Aggregate byte usage of a user's active files against the quota
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StorageUsageResponseDto {
    #[serde(rename = "usedBytes")]
    pub used_bytes: u64,
    #[serde(rename = "totalBytes")]
    pub total_bytes: u64,
    #[serde(rename = "usedGB")]
    pub used_gb: f64,
    #[serde(rename = "totalGB")]
    pub total_gb: f64,
    pub percentage: f64,
}

impl StorageUsageResponseDto {
    pub fn new(used_bytes: u64, total_bytes: u64) -> Self {
        let gb = BYTES_PER_GB as f64;
        let percentage = if total_bytes > 0 {
            used_bytes as f64 * 100.0 / total_bytes as f64
        } else {
            0.0
        };

        Self {
            used_bytes,
            total_bytes,
            used_gb: used_bytes as f64 / gb,
            total_gb: total_bytes as f64 / gb,
            percentage,
        }
    }
}
