use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{UpdateUserSettingsDto, UserSettingsResponseDto};
use crate::features::users::models::UserSettings;
use crate::features::users::repositories::{UserRepository, UserSettingsRepository};

/// Service for per-user preferences.
///
/// Settings rows are created with defaults the first time they are read or
/// written.
pub struct UserSettingsService {
    settings: Arc<dyn UserSettingsRepository>,
    users: Arc<dyn UserRepository>,
}

impl UserSettingsService {
    pub fn new(settings: Arc<dyn UserSettingsRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { settings, users }
    }

    async fn load(&self, user_id: i64) -> Result<UserSettings> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "User not found with ID: {}",
                user_id
            )));
        }
        self.settings.get_or_create(user_id).await
    }

    pub async fn get_settings(&self, user_id: i64) -> Result<UserSettingsResponseDto> {
        info!("Getting settings for user: {}", user_id);
        Ok(self.load(user_id).await?.into())
    }

    pub async fn update_settings(
        &self,
        user_id: i64,
        dto: UpdateUserSettingsDto,
    ) -> Result<UserSettingsResponseDto> {
        info!("Updating settings for user: {}", user_id);

        let mut settings = self.load(user_id).await?;
        dto.apply_to(&mut settings);

        Ok(self.settings.update(&settings).await?.into())
    }
}
