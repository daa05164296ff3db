use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::Result;
use crate::features::users::models::UserSettings;

/// Persistence boundary for user settings
#[async_trait]
pub trait UserSettingsRepository: Send + Sync {
    /// Returns the user's settings, inserting the defaults first if none exist
    async fn get_or_create(&self, user_id: i64) -> Result<UserSettings>;

    async fn update(&self, settings: &UserSettings) -> Result<UserSettings>;
}

const SETTINGS_COLUMNS: &str = "id, user_id, theme, email_notifications, push_notifications, \
                                weekly_report_notifications, created_at, updated_at";

pub struct PgUserSettingsRepository {
    pool: PgPool,
}

impl PgUserSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserSettingsRepository for PgUserSettingsRepository {
    async fn get_or_create(&self, user_id: i64) -> Result<UserSettings> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_settings
                (user_id, theme, email_notifications, push_notifications, weekly_report_notifications)
            VALUES ($1, $2, TRUE, TRUE, TRUE)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(UserSettings::DEFAULT_THEME)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() > 0 {
            tracing::info!("Created default settings for user: {}", user_id);
        }

        let settings = sqlx::query_as::<_, UserSettings>(&format!(
            "SELECT {} FROM user_settings WHERE user_id = $1",
            SETTINGS_COLUMNS
        ))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(settings)
    }

    async fn update(&self, settings: &UserSettings) -> Result<UserSettings> {
        let updated = sqlx::query_as::<_, UserSettings>(&format!(
            r#"
            UPDATE user_settings
            SET theme = $1,
                email_notifications = $2,
                push_notifications = $3,
                weekly_report_notifications = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        ))
        .bind(&settings.theme)
        .bind(settings.email_notifications)
        .bind(settings.push_notifications)
        .bind(settings.weekly_report_notifications)
        .bind(settings.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}
