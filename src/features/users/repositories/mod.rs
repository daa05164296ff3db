mod user_repository;
mod user_settings_repository;

pub use user_repository::{PgUserRepository, ProfileUpdate, UserRepository, EMAIL_IN_USE};
pub use user_settings_repository::{PgUserSettingsRepository, UserSettingsRepository};
