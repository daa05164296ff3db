use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{ChangePasswordDto, UpdateUserProfileDto, UserProfileResponseDto};
use crate::features::users::services::UserProfileService;
use crate::shared::types::{ErrorResponse, MessageResponse};
use crate::shared::validation::collect_messages;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = UserProfileResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserProfileService>>,
) -> Result<Json<UserProfileResponseDto>> {
    let profile = service.get_profile(user.user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/users/me",
    request_body = UpdateUserProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = UserProfileResponseDto),
        (status = 400, description = "Validation error or email in use", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserProfileService>>,
    AppJson(dto): AppJson<UpdateUserProfileDto>,
) -> Result<Json<UserProfileResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(collect_messages(&e).join("; ")))?;

    let profile = service.update_profile(user.user_id, dto).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/users/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error or wrong current password", body = ErrorResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    user: AuthenticatedUser,
    State(service): State<Arc<UserProfileService>>,
    AppJson(dto): AppJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>> {
    dto.validate()
        .map_err(|e| AppError::Validation(collect_messages(&e).join("; ")))?;

    service.change_password(user.user_id, dto).await?;
    Ok(Json(MessageResponse::ok("Password changed")))
}
