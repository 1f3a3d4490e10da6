//! The build plugin every kjar descriptor must declare
//!
//! The plugin version ships with the crate as a properties resource. It is
//! resolved once per process; a resource that cannot provide the version
//! leaves it absent instead of failing.

use crate::errors::ConfigError;
use crate::properties::Properties;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const KIE_PLUGIN_GROUP_ID: &str = "org.kie";
pub const KIE_PLUGIN_ARTIFACT_ID: &str = "kie-maven-plugin";

/// Name of the packaged resource holding the plugin version
pub const PLUGIN_VERSION_RESOURCE: &str = "kie-plugin-version.properties";
/// Key of the plugin version inside [`PLUGIN_VERSION_RESOURCE`]
pub const PLUGIN_VERSION_KEY: &str = "kie_plugin_version";

const PACKAGED_PROPERTIES: &str = include_str!("../resources/kie-plugin-version.properties");

static PACKAGED_PLUGIN: Lazy<PluginSpec> = Lazy::new(|| PluginSpec::resolve(PACKAGED_PROPERTIES));

/// Coordinates of a build plugin entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSpec {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub extensions: bool,
}

impl PluginSpec {
    /// The kie-maven-plugin with extensions enabled
    pub fn kie(version: Option<String>) -> Self {
        PluginSpec {
            group_id: KIE_PLUGIN_GROUP_ID.to_string(),
            artifact_id: KIE_PLUGIN_ARTIFACT_ID.to_string(),
            version,
            extensions: true,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Build the kie plugin spec from properties text, failing when the
    /// version key is missing or blank.
    pub fn from_properties(text: &str) -> Result<Self, ConfigError> {
        resolve_plugin_version(text).map(|version| PluginSpec::kie(Some(version)))
    }

    /// Like [`PluginSpec::from_properties`] but degrades to an absent version
    pub fn resolve(text: &str) -> Self {
        match PluginSpec::from_properties(text) {
            Ok(spec) => {
                debug!("Resolved {} version {:?}", KIE_PLUGIN_ARTIFACT_ID, spec.version);
                spec
            }
            Err(e) => {
                warn!("{}; the plugin entry will be written without a version", e);
                PluginSpec::kie(None)
            }
        }
    }

    /// `groupId:artifactId:version` for display
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.version.as_deref().unwrap_or("<unversioned>")
        )
    }
}

/// Read the plugin version out of properties text
pub fn resolve_plugin_version(text: &str) -> Result<String, ConfigError> {
    let properties = Properties::parse(text);
    match properties.get(PLUGIN_VERSION_KEY).map(str::trim) {
        Some(version) if !version.is_empty() => Ok(version.to_string()),
        Some(_) => Err(ConfigError::PluginVersionUnresolved {
            key: PLUGIN_VERSION_KEY.to_string(),
            reason: format!("is empty in {}", PLUGIN_VERSION_RESOURCE),
        }),
        None => Err(ConfigError::PluginVersionUnresolved {
            key: PLUGIN_VERSION_KEY.to_string(),
            reason: format!("is missing from {}", PLUGIN_VERSION_RESOURCE),
        }),
    }
}

/// The plugin spec resolved from the packaged resource.
///
/// Computed on first access and shared for the rest of the process.
pub fn packaged_plugin_spec() -> &'static PluginSpec {
    &PACKAGED_PLUGIN
}
