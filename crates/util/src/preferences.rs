//! User preference persistence for the LMS shell.
//!
//! This module provides a tiny JSON-backed store that records user-chosen UI
//! settings only: theme, language and whether the sidebar is open. Business
//! data never goes through here, which is enforced by a key allowlist. The
//! file is written to the standard configuration directory
//! (`~/.config/lms/preferences.json` on most platforms) and is safe to
//! read/write from multiple threads thanks to the internal `Mutex`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lms_types::{Language, ThemeMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::resolve_config_path;

/// Overrides the preferences file location.
pub const PREFERENCES_PATH_ENV: &str = "LMS_PREFERENCES_PATH";

/// File name under the lms config directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

pub const THEME_KEY: &str = "lms-theme";
pub const LANGUAGE_KEY: &str = "lms-language";
pub const SIDEBAR_STATE_KEY: &str = "lms-sidebar-state";

/// Keys the store accepts. Anything else is rejected.
pub const ALLOWED_KEYS: &[&str] = &[THEME_KEY, LANGUAGE_KEY, SIDEBAR_STATE_KEY];

/// Preference store failures.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// The key is not on the preference allowlist.
    #[error("preference key \"{0}\" not allowed")]
    KeyNotAllowed(String),
    #[error("cannot access preferences file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed preference value: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values keyed by allowlisted key.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferencesPayload {
    values: BTreeMap<String, Value>,
}

/// Allowlisted key/value store for shell settings, shared across threads.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Create a store at the default config path (or `LMS_PREFERENCES_PATH`).
    pub fn new() -> Result<Self, PreferencesError> {
        Self::at_path(resolve_config_path(PREFERENCES_PATH_ENV, PREFERENCES_FILE_NAME))
    }

    /// Create a store rooted at an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Store that never touches disk; used when the config directory is unusable.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Backing file; empty for [`UserPreferences::ephemeral`].
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored value for an allowlisted key.
    pub fn get(&self, key: &str) -> Result<Option<Value>, PreferencesError> {
        ensure_allowed(key)?;
        let payload = self.payload.lock().expect("preferences lock poisoned");
        Ok(payload.values.get(key).cloned())
    }

    /// Stores a value under an allowlisted key and persists the payload.
    pub fn set(&self, key: &str, value: Value) -> Result<(), PreferencesError> {
        ensure_allowed(key)?;
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        payload.values.insert(key.to_string(), value);
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    /// Removes an allowlisted key. Returns whether a value was present.
    pub fn remove(&self, key: &str) -> Result<bool, PreferencesError> {
        ensure_allowed(key)?;
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        let removed = payload.values.remove(key).is_some();
        if removed && self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(removed)
    }

    /// Removes every allowlisted key, leaving unrelated file content untouched.
    pub fn clear(&self) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        for key in ALLOWED_KEYS {
            payload.values.remove(*key);
        }
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    /// Saved theme, if one was stored and is still a known theme.
    pub fn preferred_theme(&self) -> Option<ThemeMode> {
        self.typed_string(THEME_KEY)?.parse().ok()
    }

    pub fn set_preferred_theme(&self, theme: ThemeMode) -> Result<(), PreferencesError> {
        self.set(THEME_KEY, Value::String(theme.id().to_string()))
    }

    /// Saved language, if one was stored and is still supported.
    pub fn preferred_language(&self) -> Option<Language> {
        self.typed_string(LANGUAGE_KEY)?.parse().ok()
    }

    pub fn set_preferred_language(&self, language: Language) -> Result<(), PreferencesError> {
        self.set(LANGUAGE_KEY, Value::String(language.code().to_string()))
    }

    /// Saved sidebar flag. Accepts a JSON boolean or its string spelling.
    pub fn sidebar_expanded(&self) -> Option<bool> {
        match self.get(SIDEBAR_STATE_KEY).ok().flatten()? {
            Value::Bool(flag) => Some(flag),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn set_sidebar_expanded(&self, expanded: bool) -> Result<(), PreferencesError> {
        self.set(SIDEBAR_STATE_KEY, Value::Bool(expanded))
    }

    fn typed_string(&self, key: &str) -> Option<String> {
        match self.get(key).ok().flatten()? {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn ensure_allowed(key: &str) -> Result<(), PreferencesError> {
    if ALLOWED_KEYS.contains(&key) {
        Ok(())
    } else {
        warn!(key, "Preference key not allowed");
        Err(PreferencesError::KeyNotAllowed(key.to_string()))
    }
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn rejects_keys_outside_allowlist() {
        let store = UserPreferences::ephemeral();
        assert!(matches!(
            store.set("lms-courses", json!([])),
            Err(PreferencesError::KeyNotAllowed(key)) if key == "lms-courses"
        ));
        assert!(store.get("lms-courses").is_err());
        assert!(store.remove("lms-courses").is_err());
    }

    #[test]
    fn typed_accessors_round_trip() {
        let store = UserPreferences::ephemeral();
        assert_eq!(store.preferred_theme(), None);
        store.set_preferred_theme(ThemeMode::Dark).unwrap();
        store.set_preferred_language(Language::Vi).unwrap();
        store.set_sidebar_expanded(false).unwrap();
        assert_eq!(store.preferred_theme(), Some(ThemeMode::Dark));
        assert_eq!(store.preferred_language(), Some(Language::Vi));
        assert_eq!(store.sidebar_expanded(), Some(false));
    }

    #[test]
    fn unknown_stored_values_are_ignored() {
        let store = UserPreferences::ephemeral();
        store.set(THEME_KEY, json!("sepia")).unwrap();
        store.set(SIDEBAR_STATE_KEY, json!("true")).unwrap();
        assert_eq!(store.preferred_theme(), None);
        assert_eq!(store.sidebar_expanded(), Some(true));
    }

    #[test]
    fn persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE_NAME);
        let store = UserPreferences::at_path(&path).unwrap();
        store.set_sidebar_expanded(false).unwrap();
        drop(store);

        let reloaded = UserPreferences::at_path(&path).unwrap();
        assert_eq!(reloaded.sidebar_expanded(), Some(false));
    }

    #[test]
    fn clear_removes_only_allowlisted_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, r#"{ "lms-theme": "dark", "other": 1 }"#).unwrap();
        let store = UserPreferences::at_path(&path).unwrap();
        store.clear().unwrap();
        assert_eq!(store.preferred_theme(), None);

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, json!({ "other": 1 }));
    }

    #[test]
    fn invalid_json_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, "not json").unwrap();
        let store = UserPreferences::at_path(&path).unwrap();
        assert_eq!(store.sidebar_expanded(), None);
    }
}
