//! In-memory doubles and fixtures shared by unit and handler tests

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::core::config::{AuthConfig, StorageConfig};
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AccessClaims, AuthenticatedUser};
use crate::features::files::models::{File, FileStatus, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::features::users::models::{NewUser, User, UserRole, UserSettings};
use crate::features::users::repositories::{
    ProfileUpdate, UserRepository, UserSettingsRepository, EMAIL_IN_USE,
};
use crate::modules::preview::PreviewQueue;

// =============================================================================
// AUTH
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-unit-tests-only";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        issuer: None,
        jwt_leeway: Duration::from_secs(0),
    }
}

/// Mint an HS256 access token the way the external issuer does
pub fn issue_token(user_id: i64, username: &str, role: UserRole) -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        + 3600;
    let claims = AccessClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp,
        iss: None,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn principal(user_id: i64, username: &str, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        username: username.to_string(),
        role,
    }
}

/// Inject `user` into every request, standing in for the JWT middleware
pub fn with_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

// =============================================================================
// CONFIG
// =============================================================================

pub fn test_storage_config(base_directory: &Path) -> StorageConfig {
    StorageConfig {
        base_directory: base_directory.to_path_buf(),
        max_file_size_bytes: 100 * 1024 * 1024,
        max_storage_bytes: 1024 * 1024 * 1024,
        supported_formats: vec!["txt".to_string(), "pdf".to_string(), "png".to_string()],
    }
}

// =============================================================================
// FILES
// =============================================================================

#[derive(Default)]
pub struct InMemoryFileRepository {
    rows: Mutex<Vec<File>>,
    next_id: AtomicI64,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly, bypassing storage, with a creation time
    /// `age_secs` in the past
    pub fn seed(&self, user_id: i64, original_name: &str, size: i64, age_secs: i64) -> File {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let file = File {
            id,
            name: format!("seeded_{}", id),
            original_name: original_name.to_string(),
            content_type: "application/octet-stream".to_string(),
            size,
            storage_path: format!("/nonexistent/{}", id),
            thumbnail_url: None,
            preview_url: None,
            text_content: None,
            has_text_content: false,
            status: FileStatus::Active,
            user_id,
            created_at: Utc::now() - chrono::Duration::seconds(age_secs),
            updated_at: None,
        };
        self.rows.lock().unwrap().push(file.clone());
        file
    }

    /// Replace a stored row, for tests that need unusual column values
    pub fn put(&self, file: File) {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|f| f.id != file.id);
        rows.push(file);
    }

    fn active_matching(&self, user_id: i64, search: Option<&str>) -> Vec<File> {
        let needle = search.map(str::to_lowercase);
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id && f.status == FileStatus::Active)
            .filter(|f| match &needle {
                Some(needle) => f.original_name.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<File>> {
        Ok(self.rows.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn find_active_by_user_id(&self, user_id: i64) -> Result<Vec<File>> {
        Ok(self.active_matching(user_id, None))
    }

    async fn find_active_by_user_id_paginated(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<Vec<File>> {
        let mut files = self.active_matching(user_id, search);
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(files
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_active_by_user_id(&self, user_id: i64, search: Option<&str>) -> Result<i64> {
        Ok(self.active_matching(user_id, search).len() as i64)
    }

    async fn save(&self, file: NewFile) -> Result<File> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = File {
            id,
            name: file.name,
            original_name: file.original_name,
            content_type: file.content_type,
            size: file.size,
            storage_path: file.storage_path,
            thumbnail_url: None,
            preview_url: None,
            text_content: None,
            has_text_content: false,
            status: FileStatus::Active,
            user_id: file.user_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.rows.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|f| f.id == id) {
            Some(file) => {
                file.status = FileStatus::Deleted;
                file.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Records every enqueue request
#[derive(Default)]
pub struct RecordingPreviewQueue {
    pub calls: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl PreviewQueue for RecordingPreviewQueue {
    async fn enqueue_by_content_type(&self, file_id: i64, content_type: &str) -> Result<Vec<i64>> {
        self.calls
            .lock()
            .unwrap()
            .push((file_id, content_type.to_string()));
        Ok(vec![1])
    }
}

/// Always fails, for checking that enqueue errors never fail an upload
pub struct FailingPreviewQueue;

#[async_trait]
impl PreviewQueue for FailingPreviewQueue {
    async fn enqueue_by_content_type(&self, _file_id: i64, _content_type: &str) -> Result<Vec<i64>> {
        Err(AppError::Internal("queue unavailable".to_string()))
    }
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with the given id and password hash
    pub fn seed(&self, id: i64, username: &str, email: Option<&str>, password_hash: &str) -> User {
        self.next_id.fetch_max(id, Ordering::SeqCst);
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.map(str::to_string),
            bio: None,
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.rows.lock().unwrap().push(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.username == user.username) {
            return Err(AppError::BadRequest(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }

        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: user.username,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            bio: None,
            role: user.role,
            created_at: Utc::now(),
            updated_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|u| u.id != id && u.email.as_deref() == Some(update.email.as_str()))
        {
            return Err(AppError::BadRequest(EMAIL_IN_USE.to_string()));
        }

        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User not found with ID: {}", id)))?;
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.email = Some(update.email);
        user.bio = update.bio;
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User not found with ID: {}", id)))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserSettingsRepository {
    rows: Mutex<Vec<UserSettings>>,
}

impl InMemoryUserSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserSettingsRepository for InMemoryUserSettingsRepository {
    async fn get_or_create(&self, user_id: i64) -> Result<UserSettings> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|s| s.user_id == user_id) {
            return Ok(existing.clone());
        }

        let created = UserSettings {
            id: rows.len() as i64 + 1,
            user_id,
            theme: UserSettings::DEFAULT_THEME.to_string(),
            email_notifications: true,
            push_notifications: true,
            weekly_report_notifications: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, settings: &UserSettings) -> Result<UserSettings> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == settings.id)
            .ok_or_else(|| AppError::NotFound("Settings not found".to_string()))?;
        *row = settings.clone();
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }
}
