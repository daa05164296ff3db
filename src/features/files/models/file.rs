use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Lifecycle state matching the `file_status` database enum.
///
/// Transitions only move forward; nothing reinstates a `Deleted` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "file_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum FileStatus {
    Active,
    Deleted,
    Processing,
}

/// Database model for uploaded file metadata.
///
/// Deletion is soft: a `Deleted` row stays in the table, and its bytes at
/// `storage_path` may linger if the unlink failed.
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: i64,
    /// Storage-unique name on disk
    pub name: String,
    /// Filename as supplied by the client
    pub original_name: String,
    pub content_type: String,
    /// Size in bytes as measured on disk after the write
    pub size: i64,
    pub storage_path: String,
    pub thumbnail_url: Option<String>,
    pub preview_url: Option<String>,
    pub text_content: Option<String>,
    pub has_text_content: bool,
    pub status: FileStatus,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl File {
    pub fn is_active(&self) -> bool {
        self.status == FileStatus::Active
    }
}

/// Data for inserting a freshly uploaded file
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    pub storage_path: String,
    pub user_id: i64,
}
