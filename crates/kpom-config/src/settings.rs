//! User settings file (`kpom.toml`)

use crate::errors::ConfigError;
use crate::plugin::{packaged_plugin_spec, PluginSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that points at an alternative settings file
pub const CONFIG_ENV_VAR: &str = "KPOM_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Overrides the packaged kie-maven-plugin version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_version: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn path() -> PathBuf {
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir().map_or_else(
                || PathBuf::from(".config/kpom/kpom.toml"),
                |h| h.join(".config").join("kpom").join("kpom.toml"),
            )
        }

        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map_or_else(
                || PathBuf::from("kpom\\kpom.toml"),
                |c| c.join("kpom").join("kpom.toml"),
            )
        }
    }

    /// Load settings from the default location, defaults when absent
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No settings file at {}", path.display());
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::path())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "plugin-version" => self.plugin_version.clone(),
            "log-filter" => self.log_filter.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "plugin-version" => self.plugin_version = Some(value),
            "log-filter" => self.log_filter = Some(value),
            _ => return Err(ConfigError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.plugin_version.is_none() && self.log_filter.is_none()
    }

    pub fn values_iter(&self) -> Vec<(&str, String)> {
        let mut values = Vec::new();
        if let Some(ref val) = self.plugin_version {
            values.push(("plugin-version", val.clone()));
        }
        if let Some(ref val) = self.log_filter {
            values.push(("log-filter", val.clone()));
        }
        values
    }

    /// The plugin spec to inject, honoring a version override
    pub fn plugin_spec(&self) -> PluginSpec {
        let packaged = packaged_plugin_spec().clone();
        match self.plugin_version.as_deref().map(str::trim) {
            Some(version) if !version.is_empty() => packaged.with_version(Some(version.to_string())),
            _ => packaged,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let loaded = Settings::load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(loaded.is_ok_and(|s| s.is_empty()));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("nested").join("kpom.toml");
        let mut settings = Settings::default();
        assert!(settings.set("plugin-version", "7.0.0".to_string()).is_ok());
        assert!(settings.save_to_path(&path).is_ok());

        let loaded = Settings::load_from_path(&path);
        assert!(loaded.is_ok());
        let loaded = loaded.unwrap_or_default();
        assert_eq!(loaded.get("plugin-version").as_deref(), Some("7.0.0"));
        assert_eq!(loaded.get("log-filter"), None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set("colour", "blue".to_string()),
            Err(ConfigError::UnknownSetting(_))
        ));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("kpom.toml");
        assert!(fs::write(&path, "plugin_version = [").is_ok());
        assert!(matches!(
            Settings::load_from_path(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_plugin_spec_override() {
        let settings = Settings {
            plugin_version: Some("9.9.9".to_string()),
            log_filter: None,
        };
        assert_eq!(settings.plugin_spec().version.as_deref(), Some("9.9.9"));
        assert_eq!(
            Settings::default().plugin_spec(),
            packaged_plugin_spec().clone()
        );
    }
}
