use std::io;
use thiserror::Error;

/// Errors that can occur while resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Plugin version unresolved: '{key}' {reason}")]
    PluginVersionUnresolved { key: String, reason: String },

    #[error("Unknown setting '{0}'. Supported keys: plugin-version, log-filter")]
    UnknownSetting(String),
}
