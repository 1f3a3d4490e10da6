//! Error type for the kpom command line

use kpom_config::ConfigError;
use kpom_model::ModelError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Invalid JSON edit model in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid TOML edit model in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid YAML edit model in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unsupported edit model file '{0}': expected a .json, .toml, .yaml or .yml extension")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to serialize edit model: {0}")]
    Serialize(String),

    #[error("{path}: {source}")]
    Descriptor { path: PathBuf, source: ModelError },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
