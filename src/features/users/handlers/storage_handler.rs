use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::StorageUsageResponseDto;
use crate::features::files::FileService;
use axum::{extract::State, Json};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/users/storage",
    responses(
        (status = 200, description = "Storage usage against the quota", body = StorageUsageResponseDto),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_storage_usage(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
) -> Result<Json<StorageUsageResponseDto>> {
    Ok(Json(service.calculate_storage_usage(user.user_id).await?))
}
