//! The edit model: the part of a descriptor the workbench edits
//!
//! Empty strings stand for "not present in the descriptor".

use crate::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptor model version written for new projects
pub const DEFAULT_MODEL_VERSION: &str = "4.0.0";

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

/// One of the three identity coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    GroupId,
    ArtifactId,
    Version,
}

impl IdentityField {
    pub const ALL: [IdentityField; 3] = [
        IdentityField::GroupId,
        IdentityField::ArtifactId,
        IdentityField::Version,
    ];

    /// Element name in the descriptor
    pub fn as_str(self) -> &'static str {
        match self {
            IdentityField::GroupId => "groupId",
            IdentityField::ArtifactId => "artifactId",
            IdentityField::Version => "version",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project identity (groupId, artifactId, version)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gav {
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub artifact_id: String,
    #[serde(default)]
    pub version: String,
}

impl Gav {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Gav {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    pub fn get(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::GroupId => &self.group_id,
            IdentityField::ArtifactId => &self.artifact_id,
            IdentityField::Version => &self.version,
        }
    }

    /// First coordinate that is blank
    pub fn missing_field(&self) -> Option<IdentityField> {
        IdentityField::ALL
            .into_iter()
            .find(|field| self.get(*field).trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self.missing_field() {
            Some(field) => Err(ModelError::IncompleteIdentity { field }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A `<repository>` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl RepositoryRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        RepositoryRef {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A `<dependency>` entry; an empty version is managed elsewhere
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRef {
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub artifact_id: String,
    #[serde(default)]
    pub version: String,
}

impl DependencyRef {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        DependencyRef {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

/// Fields of a project descriptor the editor understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gav: Gav,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    #[serde(default)]
    pub repositories: Vec<RepositoryRef>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
}

impl Default for EditModel {
    fn default() -> Self {
        EditModel {
            name: String::new(),
            description: String::new(),
            gav: Gav::default(),
            model_version: default_model_version(),
            repositories: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

impl EditModel {
    pub fn new(gav: Gav) -> Self {
        EditModel {
            gav,
            ..EditModel::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_repository(mut self, repository: RepositoryRef) -> Self {
        self.repositories.push(repository);
        self
    }

    pub fn with_dependency(mut self, dependency: DependencyRef) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::types::*;

    #[test]
    fn test_missing_field_order() {
        assert_eq!(Gav::default().missing_field(), Some(IdentityField::GroupId));
        assert_eq!(
            Gav::new("org.acme", " ", "1.0").missing_field(),
            Some(IdentityField::ArtifactId)
        );
        assert_eq!(Gav::new("org.acme", "demo", "1.0").missing_field(), None);
    }

    #[test]
    fn test_validate() {
        assert!(Gav::new("org.acme", "demo", "1.0").validate().is_ok());
        assert!(matches!(
            Gav::new("org.acme", "demo", "").validate(),
            Err(ModelError::IncompleteIdentity {
                field: IdentityField::Version
            })
        ));
    }

    #[test]
    fn test_gav_display() {
        assert_eq!(Gav::new("org.acme", "demo", "1.0").to_string(), "org.acme:demo:1.0");
    }

    #[test]
    fn test_edit_model_from_json_uses_defaults() {
        let json = r#"{
            "name": "Demo",
            "gav": { "groupId": "org.acme", "artifactId": "demo", "version": "1.0" },
            "dependencies": [ { "groupId": "org.acme", "artifactId": "lib" } ]
        }"#;
        let parsed: Result<EditModel, _> = serde_json::from_str(json);
        assert!(parsed.is_ok());
        let Ok(model) = parsed else { return };
        assert_eq!(model.model_version, DEFAULT_MODEL_VERSION);
        assert_eq!(model.description, "");
        assert!(model.repositories.is_empty());
        assert_eq!(model.dependencies[0].version, "");
    }
}
