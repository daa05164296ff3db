use crate::features::auth::dto::MeResponseDto;
use crate::features::auth::model::AuthenticatedUser;
use axum::Json;

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current principal", body = MeResponseDto),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Json<MeResponseDto> {
    Json(MeResponseDto::from(user))
}
