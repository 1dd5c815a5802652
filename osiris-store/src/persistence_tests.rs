//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, JSON persistence, and settings files written
//! by hand or by older versions.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::persistence::{ensure_dir, load_json, load_json_or_default, save_json, save_text};
use crate::settings_store::{Settings, SettingsStore};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.json");

    let settings = Settings {
        language: "NL".into(),
        ..Settings::default()
    };
    save_json(&file_path, &settings).await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"key": "value"});
    assert!(save_json(&nested_path, &data).await.is_ok());
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let err = load_json::<Settings>(&file_path).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_load_or_default_on_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "not json at all").await.unwrap();

    let loaded: Settings = load_json_or_default(&file_path).await;
    assert_eq!(loaded, Settings::default());
}

#[tokio::test]
async fn test_ensure_dir_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let new_dir = temp_dir.path().join("new_directory");

    ensure_dir(&new_dir).await.unwrap();
    ensure_dir(&new_dir).await.unwrap();
    assert!(new_dir.is_dir());
}

#[tokio::test]
async fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    save_text(&file_path, "first").await.unwrap();
    save_text(&file_path, "second").await.unwrap();

    assert_eq!(tokio::fs::read_to_string(&file_path).await.unwrap(), "second");
    assert!(!temp_dir.path().join("settings.json.tmp").exists());
}

// ============================================================================
// Settings File Compatibility
// ============================================================================

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"default_weeks": 2}"#).await.unwrap();

    let store = SettingsStore::load(file_path).await.unwrap();
    assert_eq!(store.get().default_weeks, 2);
    assert_eq!(store.get().language, "EN");
    assert_eq!(store.get().request_timeout_secs, 30);
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"language": "NL", "theme": "dark"}"#)
        .await
        .unwrap();

    let store = SettingsStore::load(file_path).await.unwrap();
    assert_eq!(store.get().language, "NL");
}

#[tokio::test]
async fn test_load_rejects_unusable_values() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"request_timeout_secs": 0}"#).await.unwrap();

    assert!(SettingsStore::load(file_path).await.is_err());
}
