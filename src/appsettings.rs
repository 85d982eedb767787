use std::path::PathBuf;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct StorageSettings {
    pub documents_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NotificationSettings {
    pub grant_authorization: bool,
    pub present_in_foreground: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            grant_authorization: true,
            present_in_foreground: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub notifications: NotificationSettings,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("storage.documents_dir", ".")?
            .set_default("notifications.grant_authorization", true)?
            .set_default("notifications.present_in_foreground", true)?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("ALARM").separator("__")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_source() {
        let settings: AppSettings = AppSettings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.storage.documents_dir, PathBuf::from("."));
        assert!(settings.notifications.grant_authorization);
        assert!(settings.notifications.present_in_foreground);
    }

    #[test]
    fn overrides_win_over_defaults() {
        let settings: AppSettings = AppSettings::builder()
            .unwrap()
            .set_override("notifications.grant_authorization", false)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!settings.notifications.grant_authorization);
    }
}
