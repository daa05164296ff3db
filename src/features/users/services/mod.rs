mod default_users;
mod user_profile_service;
mod user_settings_service;

pub use default_users::seed_default_users;
pub use user_profile_service::UserProfileService;
pub use user_settings_service::UserSettingsService;
