//! Environment settings for the LMS shell.
//!
//! Loaded from `LMS_CONFIG_PATH` or `<config_dir>/lms/config.json`. Every
//! field has a default, so a missing or partial file is fine; an unparsable
//! file is logged and replaced by defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{join_context_path, resolve_config_path};

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "LMS_CONFIG_PATH";

/// Default filename for the config file.
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        })
    }
}

/// Mock gateway behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Lower bound of the simulated latency.
    pub base_delay_ms: u64,
    /// Upper bound of the simulated latency.
    pub max_delay_ms: u64,
    /// Probability (0..=1) that a call fails with a simulated network error.
    pub error_rate: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 300,
            max_delay_ms: 1000,
            error_rate: 0.0,
        }
    }
}

impl ApiConfig {
    /// Zero latency, zero failures. Used by tests and one-shot CLI calls.
    pub fn instant() -> Self {
        Self {
            base_delay_ms: 0,
            max_delay_ms: 0,
            error_rate: 0.0,
        }
    }
}

/// Responsive layout thresholds and timings.
///
/// Widths are in the host's own units: CSS pixels for a browser-like host,
/// terminal columns for the shell (see `terminal()`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Widths strictly greater than this are desktop.
    pub desktop_above: u32,
    /// Widths strictly greater than this (and not desktop) are tablet.
    pub tablet_above: u32,
    /// Quiet period before a burst of resizes is applied.
    pub resize_debounce_ms: u64,
    /// Duration of the backdrop closing transition.
    pub backdrop_transition_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            desktop_above: 1024,
            tablet_above: 767,
            resize_debounce_ms: 250,
            backdrop_transition_ms: 300,
        }
    }
}

impl LayoutConfig {
    /// Breakpoints scaled to terminal columns.
    pub fn terminal() -> Self {
        Self {
            desktop_above: 119,
            tablet_above: 79,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LmsConfig {
    /// Deployment prefix without trailing slash (`""` or `"/LMS"`).
    pub context_path: String,
    pub api_base_url: String,
    pub environment: Environment,
    pub debug: bool,
    /// Directory overriding the embedded fixtures and translations.
    pub data_dir: Option<PathBuf>,
    pub api: ApiConfig,
    pub layout: LayoutConfig,
}

impl Default for LmsConfig {
    fn default() -> Self {
        Self {
            context_path: String::new(),
            api_base_url: String::new(),
            environment: Environment::Development,
            debug: true,
            data_dir: None,
            api: ApiConfig::default(),
            layout: LayoutConfig::terminal(),
        }
    }
}

impl LmsConfig {
    /// Loads the config from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Loads the config from `path`; missing files yield defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => Ok(config),
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Failed to parse config file; using defaults");
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(ConfigError::Io(error)),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Absolute resource path under the deployment context.
    pub fn resource_path(&self, relative_path: &str) -> String {
        join_context_path(&self.context_path, relative_path)
    }
}

/// Get the default path for the config file.
pub fn default_config_path() -> PathBuf {
    resolve_config_path(CONFIG_PATH_ENV, CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "contextPath": "ignored", "context_path": "/LMS", "api": { "error_rate": 0.5 } }"#).unwrap();

        let config = LmsConfig::load_from(&path).unwrap();
        assert_eq!(config.context_path, "/LMS");
        assert_eq!(config.api.error_rate, 0.5);
        assert_eq!(config.api.base_delay_ms, 300);
        assert_eq!(config.layout.resize_debounce_ms, 250);
        assert_eq!(config.resource_path("/data/mock-users.json"), "/LMS/data/mock-users.json");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = LmsConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, LmsConfig::default());
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join(CONFIG_FILE_NAME);
        let config = LmsConfig {
            environment: Environment::Staging,
            debug: false,
            ..LmsConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(LmsConfig::load_from(&path).unwrap(), config);
    }
}
