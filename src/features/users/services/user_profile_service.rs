use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{ChangePasswordDto, UpdateUserProfileDto, UserProfileResponseDto};
use crate::features::users::models::User;
use crate::features::users::password::PasswordHasher;
use crate::features::users::repositories::{ProfileUpdate, UserRepository};

/// Service for the caller's own profile and password
pub struct UserProfileService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserProfileService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    async fn get_user(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found with ID: {}", user_id)))
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfileResponseDto> {
        info!("Getting profile for user: {}", user_id);
        Ok(self.get_user(user_id).await?.into())
    }

    /// Replace name, email and bio. The email may not belong to another account.
    pub async fn update_profile(
        &self,
        user_id: i64,
        dto: UpdateUserProfileDto,
    ) -> Result<UserProfileResponseDto> {
        info!("Updating profile for user: {}", user_id);

        let update = ProfileUpdate {
            first_name: dto.first_name.trim().to_string(),
            last_name: dto.last_name.trim().to_string(),
            email: dto.email.trim().to_string(),
            bio: dto.bio,
        };

        let user = self.users.update_profile(user_id, update).await?;
        Ok(user.into())
    }

    pub async fn change_password(&self, user_id: i64, dto: ChangePasswordDto) -> Result<()> {
        info!("Changing password for user: {}", user_id);

        let user = self.get_user(user_id).await?;

        if !self
            .hasher
            .verify_blocking(&dto.current_password, &user.password_hash)
            .await?
        {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        if self
            .hasher
            .verify_blocking(&dto.new_password, &user.password_hash)
            .await?
        {
            return Err(AppError::BadRequest(
                "New password must differ from the old password".to_string(),
            ));
        }

        let password_hash = self.hasher.hash_blocking(&dto.new_password).await?;
        self.users.update_password(user_id, &password_hash).await?;

        info!("Password changed for user: {}", user_id);
        Ok(())
    }
}
