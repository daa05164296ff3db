use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dto as auth_dto, handler as auth_handler};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::users::handlers::{profile_handler, settings_handler, storage_handler};
use crate::features::users::{dtos as users_dtos, models as users_models};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handler::get_me,
        // Users
        profile_handler::get_profile,
        profile_handler::update_profile,
        profile_handler::change_password,
        settings_handler::get_settings,
        settings_handler::update_settings,
        storage_handler::get_storage_usage,
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::download_file,
        files_handlers::get_file_text,
        files_handlers::delete_file,
        files_handlers::get_file_limits,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            // Auth
            auth_dto::MeResponseDto,
            users_models::UserRole,
            // Users
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdateUserProfileDto,
            users_dtos::ChangePasswordDto,
            users_dtos::UserSettingsResponseDto,
            users_dtos::NotificationSettingsDto,
            users_dtos::UpdateUserSettingsDto,
            users_dtos::UpdateNotificationSettingsDto,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::FileListResponseDto,
            files_dtos::FileTextContentResponseDto,
            files_dtos::DeleteFileResponseDto,
            files_dtos::FileLimitsResponseDto,
            files_dtos::StorageUsageResponseDto,
        )
    ),
    tags(
        (name = "auth", description = "Session probe for the bearer token"),
        (name = "users", description = "Profile, password, settings and storage usage"),
        (name = "files", description = "Upload, list, download and delete files"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "pCloud API",
        version = "0.1.0",
        description = "API documentation for pCloud",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
