use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Per-user preferences, at most one row per user
#[derive(Debug, Clone, FromRow)]
pub struct UserSettings {
    pub id: i64,
    pub user_id: i64,
    /// One of `light`, `dark` or `system`
    pub theme: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub weekly_report_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserSettings {
    pub const DEFAULT_THEME: &'static str = "light";
    pub const THEMES: [&'static str; 3] = ["light", "dark", "system"];
}
