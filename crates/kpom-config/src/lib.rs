//! Configuration for kpom
//!
//! - [`plugin`]: the kie-maven-plugin spec and its packaged version
//! - [`properties`]: reader for the packaged `.properties` resource
//! - [`settings`]: the optional user settings file

pub mod errors;
pub mod plugin;
pub mod properties;
pub mod settings;

pub use errors::ConfigError;
pub use plugin::{packaged_plugin_spec, resolve_plugin_version, PluginSpec};
pub use properties::Properties;
pub use settings::Settings;
