//! User preferences store.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, remove_file, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
///
/// Missing keys take their default, so older files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Value of the `taal` header sent to the portal.
    pub language: String,

    /// Timeout for each request, redirects included.
    pub request_timeout_secs: u64,

    /// `limit` for grades and registered exams.
    pub result_limit: u32,

    /// Weeks shown by `schedule` without `--n_weeks`.
    pub default_weeks: u32,

    /// Serve the schedule from the weekly cache when possible.
    pub schedule_cache_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "EN".to_string(),
            request_timeout_secs: 30,
            result_limit: 100,
            default_weeks: 1,
            schedule_cache_enabled: true,
        }
    }
}

impl Settings {
    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks values that would make every request fail.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` naming the offending key.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.language.trim().is_empty() {
            return Err(StoreError::Config("language must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(StoreError::Config("request_timeout_secs must be positive".into()));
        }
        if self.result_limit == 0 {
            return Err(StoreError::Config("result_limit must be positive".into()));
        }
        if self.default_weeks == 0 {
            return Err(StoreError::Config("default_weeks must be positive".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings bound to the file they were loaded from.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Settings,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Settings::default(),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the stored values are unusable.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file gives the defaults; an unparsable one is logged and
    /// also gives the defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the stored values are unusable.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = match load_json::<Settings>(&path).await {
            Ok(settings) => {
                info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };
        settings.validate()?;
        Ok(Self { settings, path })
    }

    /// Current settings.
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Changes settings in memory; call [`save`](Self::save) to persist.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` for unusable values, or an I/O error if
    /// the file cannot be written.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.settings.validate()?;
        save_json(&self.path, &self.settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Restores the defaults and removes the settings file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if an existing file cannot be removed.
    pub async fn reset(&mut self) -> Result<(), StoreError> {
        self.settings = Settings::default();
        if remove_file(&self.path).await? {
            info!(path = %self.path.display(), "Settings reset");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.language, "EN");
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.result_limit, 100);
        assert_eq!(settings.default_weeks, 1);
        assert!(settings.schedule_cache_enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));

        let settings = Settings {
            default_weeks: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await.unwrap();
        assert_eq!(store.get(), &Settings::default());
    }

    #[tokio::test]
    async fn test_update_save_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("osiris").join("settings.json");

        let mut store = SettingsStore::new(path.clone());
        store.update(|s| {
            s.language = "NL".into();
            s.default_weeks = 3;
        });
        store.save().await.unwrap();

        let reloaded = SettingsStore::load(path).await.unwrap();
        assert_eq!(reloaded.get().language, "NL");
        assert_eq!(reloaded.get().default_weeks, 3);
        assert_eq!(reloaded.get().result_limit, 100);
    }

    #[tokio::test]
    async fn test_save_refuses_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = SettingsStore::new(path.clone());
        store.update(|s| s.result_limit = 0);
        assert!(store.save().await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = SettingsStore::new(path.clone());
        store.update(|s| s.schedule_cache_enabled = false);
        store.save().await.unwrap();

        store.reset().await.unwrap();
        assert!(store.get().schedule_cache_enabled);
        assert!(!path.exists());

        // Resetting again without a file is fine
        store.reset().await.unwrap();
    }
}
