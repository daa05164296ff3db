use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::UserSettings;
use crate::shared::validation::THEME_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsDto {
    pub email: bool,
    pub push: bool,
    pub weekly_report: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSettingsResponseDto {
    /// `light`, `dark` or `system`
    pub theme: String,
    pub notifications: NotificationSettingsDto,
}

impl From<UserSettings> for UserSettingsResponseDto {
    fn from(settings: UserSettings) -> Self {
        Self {
            theme: settings.theme,
            notifications: NotificationSettingsDto {
                email: settings.email_notifications,
                push: settings.push_notifications,
                weekly_report: settings.weekly_report_notifications,
            },
        }
    }
}

/// Notification toggles to change; omitted ones keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationSettingsDto {
    pub email: Option<bool>,
    pub push: Option<bool>,
    pub weekly_report: Option<bool>,
}

/// Partial settings update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserSettingsDto {
    #[validate(regex(
        path = *THEME_REGEX,
        message = "Theme must be one of: light, dark, system"
    ))]
    pub theme: Option<String>,
    pub notifications: Option<UpdateNotificationSettingsDto>,
}

impl UpdateUserSettingsDto {
    /// Copy the provided fields onto `settings`
    pub fn apply_to(self, settings: &mut UserSettings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }

        if let Some(notifications) = self.notifications {
            if let Some(email) = notifications.email {
                settings.email_notifications = email;
            }
            if let Some(push) = notifications.push {
                settings.push_notifications = push;
            }
            if let Some(weekly_report) = notifications.weekly_report {
                settings.weekly_report_notifications = weekly_report;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn defaults() -> UserSettings {
        UserSettings {
            id: 1,
            user_id: 1,
            theme: UserSettings::DEFAULT_THEME.to_string(),
            email_notifications: true,
            push_notifications: true,
            weekly_report_notifications: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_partial_update_touches_only_provided_fields() {
        let mut settings = defaults();
        let dto = UpdateUserSettingsDto {
            theme: None,
            notifications: Some(UpdateNotificationSettingsDto {
                push: Some(false),
                ..Default::default()
            }),
        };

        dto.apply_to(&mut settings);

        assert_eq!(settings.theme, "light");
        assert!(settings.email_notifications);
        assert!(!settings.push_notifications);
        assert!(settings.weekly_report_notifications);
    }

    #[test]
    fn test_theme_must_be_known() {
        let dto = UpdateUserSettingsDto {
            theme: Some("blue".to_string()),
            notifications: None,
        };
        assert!(dto.validate().is_err());

        let dto = UpdateUserSettingsDto {
            theme: Some("system".to_string()),
            notifications: None,
        };
        assert!(dto.validate().is_ok());
        assert!(UpdateUserSettingsDto::default().validate().is_ok());
    }

    #[test]
    fn test_response_shape() {
        let json = serde_json::to_value(UserSettingsResponseDto::from(defaults())).unwrap();
        assert_eq!(json["theme"], "light");
        assert_eq!(json["notifications"]["weeklyReport"], true);
    }
}
