//! TOML-based tracker configuration.
//!
//! Stores the API endpoint and token, the study-site origin seeded into
//! every session allowlist, idle/prompt timings, streak/fatigue thresholds,
//! and the distraction-policy toggles.
//!
//! Configuration is stored at `~/.config/cogniflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::tracker::{IdleConfig, MomentumConfig, TrackerPolicy};

/// Session store / auth service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token. The `COGNIFLOW_TOKEN` environment variable takes
    /// precedence when set.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_study_origin() -> String {
    "localhost".to_string()
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cogniflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub api: ApiConfig,
    /// Origin of the study dashboard itself, always seeded into the
    /// session allowlist so the dashboard tab reads as allowed browsing.
    #[serde(default = "default_study_origin")]
    pub study_origin: String,
    #[serde(default)]
    pub idle: IdleConfig,
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub policy: TrackerPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            study_origin: default_study_origin(),
            idle: IdleConfig::default(),
            momentum: MomentumConfig::default(),
            policy: TrackerPolicy::default(),
        }
    }
}

impl TrackerConfig {
    /// Default path: `~/.config/cogniflow/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("cogniflow").join("config.toml"))
    }

    /// Load from the default path, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The resolved bearer token: environment first, then config.
    pub fn token(&self) -> Option<String> {
        std::env::var("COGNIFLOW_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.api.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: TrackerConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.study_origin, "localhost");
        assert_eq!(config.idle.idle_threshold_secs, 300);
        assert_eq!(config.idle.prompt_timeout_secs, 30);
        assert_eq!(config.momentum.streak_interval_secs, 1500);
        assert_eq!(config.momentum.fatigue_interval_secs, 3600);
        assert_eq!(config.momentum.fatigue_step, 5);
        assert!(!config.policy.distract_on_hidden);
        assert!(config.policy.idle_detection);
        assert!(config.policy.allowlist_restore);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: TrackerConfig = toml::from_str(
            r#"
            study_origin = "app.local"

            [policy]
            distract_on_hidden = true
            "#,
        )
        .unwrap();
        assert_eq!(config.study_origin, "app.local");
        assert!(config.policy.distract_on_hidden);
        assert!(config.policy.idle_detection);
        assert_eq!(config.idle.idle_threshold_secs, 300);
    }

    #[test]
    fn test_roundtrip_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = TrackerConfig::default();
        config.study_origin = "app.local".into();
        config.api.token = Some("secret".into());
        config.save_to(&path).unwrap();

        let loaded = TrackerConfig::load_from(&path).unwrap();
        assert_eq!(loaded.study_origin, "app.local");
        assert_eq!(loaded.api.token.as_deref(), Some("secret"));
    }
}
