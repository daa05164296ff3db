use crate::features::files::FileService;
use crate::features::users::handlers::{profile_handler, settings_handler, storage_handler};
use crate::features::users::services::{UserProfileService, UserSettingsService};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Protected user routes (require JWT authentication)
pub fn protected_routes(
    profile_service: Arc<UserProfileService>,
    settings_service: Arc<UserSettingsService>,
    file_service: Arc<FileService>,
) -> Router {
    let profile = Router::new()
        .route(
            "/users/me",
            get(profile_handler::get_profile).put(profile_handler::update_profile),
        )
        .route("/users/change-password", post(profile_handler::change_password))
        .with_state(profile_service);

    let settings = Router::new()
        .route(
            "/users/settings",
            get(settings_handler::get_settings).put(settings_handler::update_settings),
        )
        .with_state(settings_service);

    let storage = Router::new()
        .route("/users/storage", get(storage_handler::get_storage_usage))
        .with_state(file_service);

    profile.merge(settings).merge(storage)
}
