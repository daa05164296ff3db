mod user;
mod user_settings;

pub use user::{NewUser, User, UserRole};
pub use user_settings::UserSettings;
