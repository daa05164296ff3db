use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateUserSettingsDto, UserSettingsResponseDto};
use crate::features::users::services::UserSettingsService;
use crate::shared::types::ErrorResponse;
use crate::shared::validation::collect_messages;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/users/settings",
    responses(
        (status = 200, description = "Current settings", body = UserSettingsResponseDto),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_settings(
    user: AuthenticatedUser,
    State(service): State<Arc<UserSettingsService>>,
) -> Result<Json<UserSettingsResponseDto>> {
    Ok(Json(service.get_settings(user.user_id).await?))
}

#[utoipa::path(
    put,
    path = "/users/settings",
    request_body = UpdateUserSettingsDto,
    responses(
        (status = 200, description = "Updated settings", body = UserSettingsResponseDto),
        (status = 400, description = "Unknown theme", body = ErrorResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_settings(
    user: AuthenticatedUser,
    State(service): State<Arc<UserSettingsService>>,
    AppJson(dto): AppJson<UpdateUserSettingsDto>,
) -> Result<Json<UserSettingsResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(collect_messages(&e).join("; ")))?;

    Ok(Json(service.update_settings(user.user_id, dto).await?))
}
