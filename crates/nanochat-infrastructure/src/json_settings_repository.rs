//! JSON-file SettingsRepository implementation.

use crate::dto::{StoredSettings, STORAGE_VERSION};
use crate::paths::StoragePaths;
use async_trait::async_trait;
use nanochat_core::config::{ChatSettings, SettingsRepository};
use nanochat_core::error::Result;
use std::fs;
use std::path::Path;

/// Stores chat settings as a versioned JSON document, scoped per user.
///
/// A missing, unreadable or version-mismatched document loads as the
/// defaults; values are normalized on both load and save so out-of-range
/// settings never survive a round trip.
pub struct JsonSettingsRepository {
    paths: StoragePaths,
    user_id: String,
}

impl JsonSettingsRepository {
    /// Creates a repository rooted at `base_dir`, scoped to the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>, user_id: impl Into<String>) -> Result<Self> {
        let paths = StoragePaths::new(base_dir);
        let user_id = user_id.into();
        fs::create_dir_all(paths.user_dir(&user_id))?;
        Ok(Self { paths, user_id })
    }

    /// Creates a repository at the default location (`~/.nanochat`).
    pub fn default_location(user_id: impl Into<String>) -> Result<Self> {
        let paths = StoragePaths::default_location()?;
        let user_id = user_id.into();
        fs::create_dir_all(paths.user_dir(&user_id))?;
        Ok(Self { paths, user_id })
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self) -> Result<ChatSettings> {
        let file = self.paths.settings_file(&self.user_id);
        if !file.exists() {
            return Ok(ChatSettings::default());
        }
        let raw = fs::read_to_string(&file)?;
        match serde_json::from_str::<StoredSettings>(&raw) {
            Ok(stored) if stored.v == STORAGE_VERSION => Ok(stored.settings.normalized()),
            _ => {
                tracing::warn!("discarding unreadable settings document");
                Ok(ChatSettings::default())
            }
        }
    }

    async fn save(&self, settings: &ChatSettings) -> Result<()> {
        let file = self.paths.settings_file(&self.user_id);
        let stored = StoredSettings {
            v: STORAGE_VERSION,
            settings: settings.clone().normalized(),
        };
        fs::write(&file, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let repository = JsonSettingsRepository::new(dir.path(), "user-1").unwrap();
        assert_eq!(repository.load().await.unwrap(), ChatSettings::default());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let repository = JsonSettingsRepository::new(dir.path(), "user-1").unwrap();

        let settings = ChatSettings {
            system_prompt: "Be brief.".to_string(),
            temperature: 1.5,
            top_k: 10,
            stream: false,
            target_lang: "fr".to_string(),
        };
        repository.save(&settings).await.unwrap();
        assert_eq!(repository.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_out_of_range_values_are_clamped_on_load() {
        let dir = TempDir::new().unwrap();
        let repository = JsonSettingsRepository::new(dir.path(), "user-1").unwrap();

        let document = serde_json::json!({
            "v": STORAGE_VERSION,
            "settings": {
                "system_prompt": "ok",
                "temperature": 9.0,
                "top_k": 500,
                "stream": true,
                "target_lang": "en",
            }
        });
        let file = repository.paths.settings_file("user-1");
        fs::write(&file, document.to_string()).unwrap();

        let loaded = repository.load().await.unwrap();
        assert_eq!(loaded.temperature, 2.0);
        assert_eq!(loaded.top_k, 40);
    }

    #[tokio::test]
    async fn test_version_mismatch_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let repository = JsonSettingsRepository::new(dir.path(), "user-1").unwrap();

        let file = repository.paths.settings_file("user-1");
        fs::write(&file, r#"{"v": 0, "settings": {}}"#).unwrap();
        assert_eq!(repository.load().await.unwrap(), ChatSettings::default());
    }
}
