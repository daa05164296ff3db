use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::config::{PreviewConfig, StorageConfig};
use crate::core::error::{AppError, Result};
use crate::features::files::content_type;
use crate::features::files::dtos::{FileLimitsResponseDto, StorageUsageResponseDto};
use crate::features::files::models::{File, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::features::users::repositories::UserRepository;
use crate::modules::preview::PreviewQueue;
use crate::modules::storage::{LocalStorage, RemoveOutcome};
use crate::shared::constants::PUBLIC_USER_ID;
use crate::shared::types::page_offset;

/// An opened file ready to be streamed, with the metadata it belongs to
#[derive(Debug)]
pub struct FileContent {
    pub file: File,
    pub reader: tokio::fs::File,
}

/// Why file content could not be handed out
#[derive(Debug, Error)]
pub enum FileContentError {
    #[error("File not found")]
    NotFound,

    #[error("Access denied")]
    Forbidden,

    #[error("File content missing: {0}")]
    Io(#[source] std::io::Error),

    #[error(transparent)]
    Lookup(#[from] AppError),
}

impl From<FileContentError> for AppError {
    fn from(err: FileContentError) -> Self {
        match err {
            FileContentError::NotFound => AppError::NotFound("File not found".to_string()),
            FileContentError::Forbidden => AppError::Forbidden("Access denied".to_string()),
            FileContentError::Io(_) => AppError::NotFound("File content missing".to_string()),
            FileContentError::Lookup(e) => e,
        }
    }
}

/// Keep only the last path component and replace spaces with underscores.
/// Both `/` and `\` count as separators.
fn sanitize_filename(original: &str) -> String {
    let leaf = original.rsplit(['/', '\\']).next().unwrap_or_default();
    match leaf.trim() {
        "" | "." | ".." => "unnamed".to_string(),
        _ => leaf.replace(' ', "_"),
    }
}

/// Service for the file lifecycle: upload, listing, retrieval, soft delete
/// and usage accounting
pub struct FileService {
    files: Arc<dyn FileRepository>,
    users: Arc<dyn UserRepository>,
    preview_queue: Arc<dyn PreviewQueue>,
    storage: LocalStorage,
    storage_config: StorageConfig,
    preview_enabled: bool,
}

impl FileService {
    pub fn new(
        files: Arc<dyn FileRepository>,
        users: Arc<dyn UserRepository>,
        preview_queue: Arc<dyn PreviewQueue>,
        storage_config: StorageConfig,
        preview_config: &PreviewConfig,
    ) -> Self {
        Self {
            files,
            users,
            preview_queue,
            storage: LocalStorage::new(storage_config.base_directory.clone()),
            storage_config,
            preview_enabled: preview_config.enabled,
        }
    }

    pub fn limits(&self) -> FileLimitsResponseDto {
        FileLimitsResponseDto::from(&self.storage_config)
    }

    /// Stream an upload to disk and record it.
    ///
    /// The stored size is whatever landed on disk; `declared_size` is only
    /// logged. The content type is resolved from the filename unless the
    /// client supplied a specific one. `content` is dropped before returning
    /// on every path.
    pub async fn upload_file<R>(
        &self,
        user_id: i64,
        original_filename: &str,
        provided_content_type: &str,
        declared_size: Option<u64>,
        mut content: R,
    ) -> Result<File>
    where
        R: AsyncRead + Unpin + Send,
    {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found with ID: {}", user_id)))?;

        let resolved_content_type = content_type::detect(original_filename, provided_content_type);
        let storage_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_filename));

        let directory = self.storage.ensure_user_directory(user.id).await?;
        let target = directory.join(&storage_name);

        debug!(
            "Uploading '{}' as {} (declared size {:?}, content type {})",
            original_filename,
            target.display(),
            declared_size,
            resolved_content_type
        );

        let written = self.storage.write_stream(&target, &mut content).await;
        drop(content);
        let copied = match written {
            Ok(copied) => copied,
            Err(e) => {
                warn!("Upload of {} failed mid-stream: {}", storage_name, e);
                if let Err(cleanup) = self.storage.remove(&target).await {
                    error!("Failed to remove partial upload {}: {}", target.display(), cleanup);
                }
                return Err(e.into());
            }
        };

        let size = self.storage.file_size(&target).await?;
        if declared_size.is_some_and(|declared| declared != size) {
            debug!(
                "Declared size {:?} differs from stored size {} for {}",
                declared_size, size, storage_name
            );
        }
        debug!("Copied {} bytes, {} on disk", copied, size);

        let file = self
            .files
            .save(NewFile {
                name: storage_name,
                original_name: original_filename.to_string(),
                content_type: resolved_content_type,
                size: size as i64,
                storage_path: target.to_string_lossy().into_owned(),
                user_id: user.id,
            })
            .await?;

        info!(
            "File uploaded: id={}, user={}, size={}, type={}",
            file.id, user.id, file.size, file.content_type
        );

        if self.preview_enabled {
            match self
                .preview_queue
                .enqueue_by_content_type(file.id, &file.content_type)
                .await
            {
                Ok(job_ids) => debug!("Queued preview jobs {:?} for file {}", job_ids, file.id),
                Err(e) => error!("Failed to queue preview jobs for file {}: {}", file.id, e),
            }
        }

        Ok(file)
    }

    /// Plain lookup by id; soft-deleted rows are returned too
    pub async fn get_file(&self, file_id: i64) -> Result<Option<File>> {
        self.files.find_by_id(file_id).await
    }

    /// Lookup that hides soft-deleted rows behind `NotFound`
    pub async fn find_visible_file(&self, file_id: i64) -> Result<File> {
        self.files
            .find_by_id(file_id)
            .await?
            .filter(File::is_active)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// All active files of a user, unordered
    pub async fn get_files_for_user(&self, user_id: i64) -> Result<Vec<File>> {
        self.files.find_active_by_user_id(user_id).await
    }

    /// One page of active files, newest first
    pub async fn get_files_for_user_paginated(
        &self,
        user_id: i64,
        page: i64,
        page_size: i64,
        search: Option<&str>,
    ) -> Result<Vec<File>> {
        self.files
            .find_active_by_user_id_paginated(user_id, page_offset(page, page_size), page_size, search)
            .await
    }

    pub async fn get_total_file_count(&self, user_id: i64, search: Option<&str>) -> Result<i64> {
        self.files.count_active_by_user_id(user_id, search).await
    }

    /// Open a file for reading on behalf of `user_id`.
    ///
    /// Files owned by the public account are readable by anyone.
    pub async fn get_file_content(
        &self,
        file_id: i64,
        user_id: i64,
        is_admin: bool,
    ) -> std::result::Result<FileContent, FileContentError> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(File::is_active)
            .ok_or(FileContentError::NotFound)?;

        if !(is_admin || file.user_id == user_id || file.user_id == PUBLIC_USER_ID) {
            warn!(
                "Denied content of file {} (owner {}) to user {}",
                file_id, file.user_id, user_id
            );
            return Err(FileContentError::Forbidden);
        }

        match self.storage.open(Path::new(&file.storage_path)).await {
            Ok(reader) => Ok(FileContent { file, reader }),
            Err(e) => {
                error!(
                    "Cannot open content of file {} at {}: {}",
                    file_id, file.storage_path, e
                );
                Err(FileContentError::Io(e))
            }
        }
    }

    /// Extracted text of a file the caller may read
    pub async fn get_text_content(
        &self,
        file_id: i64,
        user_id: i64,
        is_admin: bool,
    ) -> Result<String> {
        let file = self.find_visible_file(file_id).await?;

        if !(is_admin || file.user_id == user_id) {
            warn!("Access denied: user={} tried to read text of file={}", user_id, file_id);
            return Err(AppError::Forbidden(
                "You don't have access to this file".to_string(),
            ));
        }

        file.text_content
            .ok_or_else(|| AppError::NotFound("Text content not available".to_string()))
    }

    /// Soft-delete a file, then try to remove its bytes.
    ///
    /// Returns false when the file is absent, already deleted, or not the
    /// caller's. Once the row is marked deleted the result is true even if
    /// the unlink fails.
    pub async fn delete_file(&self, file_id: i64, user_id: i64, is_admin: bool) -> Result<bool> {
        let Some(file) = self.files.find_by_id(file_id).await?.filter(File::is_active) else {
            return Ok(false);
        };

        if !(is_admin || file.user_id == user_id) {
            warn!(
                "User {} may not delete file {} owned by {}",
                user_id, file_id, file.user_id
            );
            return Ok(false);
        }

        if !self.files.soft_delete(file_id).await? {
            return Ok(false);
        }
        info!("File {} marked deleted by user {}", file_id, user_id);

        match self.storage.remove(Path::new(&file.storage_path)).await {
            Ok(RemoveOutcome::Removed) => info!("Removed {}", file.storage_path),
            Ok(RemoveOutcome::Missing) => {
                warn!("Physical file already missing: {}", file.storage_path)
            }
            Err(e) => error!("Failed to remove {}: {}", file.storage_path, e),
        }

        Ok(true)
    }

    /// Sum of active file sizes against the configured quota
    pub async fn calculate_storage_usage(&self, user_id: i64) -> Result<StorageUsageResponseDto> {
        let used_bytes: u64 = self
            .files
            .find_active_by_user_id(user_id)
            .await?
            .iter()
            .filter(|f| f.is_active())
            .map(|f| f.size.max(0) as u64)
            .sum();

        Ok(StorageUsageResponseDto::new(
            used_bytes,
            self.storage_config.max_storage_bytes,
        ))
    }
}
