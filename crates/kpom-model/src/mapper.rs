//! Mapping between [`EditModel`] and the descriptor tree
//!
//! Writing touches only the mapped elements. Scalar fields are updated in
//! place (or inserted at their usual position in a POM); the repository and
//! dependency lists are rebuilt from the model. Everything else in the tree
//! is left as parsed.

use crate::errors::ModelError;
use crate::types::{DependencyRef, EditModel, Gav, IdentityField, RepositoryRef};
use kpom_tree::{DescriptorTree, Element};
use tracing::debug;

/// Packaging written to every descriptor
pub const PACKAGING: &str = "kjar";

pub const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const POM_SCHEMA_LOCATION: &str =
    "http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd";

/// Order of top-level elements in a 4.0.0 POM
pub(crate) const PROJECT_ORDER: &[&str] = &[
    "modelVersion",
    "parent",
    "groupId",
    "artifactId",
    "version",
    "packaging",
    "name",
    "description",
    "url",
    "inceptionYear",
    "organization",
    "licenses",
    "developers",
    "contributors",
    "mailingLists",
    "prerequisites",
    "modules",
    "scm",
    "issueManagement",
    "ciManagement",
    "distributionManagement",
    "properties",
    "dependencyManagement",
    "dependencies",
    "repositories",
    "pluginRepositories",
    "build",
    "reports",
    "reporting",
    "profiles",
];

/// An empty `<project>` with the POM namespace declarations
pub fn new_project_tree() -> DescriptorTree {
    let root = Element::new("project")
        .with_attribute("xmlns", POM_NAMESPACE)
        .with_attribute("xmlns:xsi", XSI_NAMESPACE)
        .with_attribute("xsi:schemaLocation", POM_SCHEMA_LOCATION);
    DescriptorTree::new(root)
}

/// Node index after which a missing `name` child belongs, following `order`.
///
/// Names outside `order` go after the last element child.
pub(crate) fn insertion_anchor(parent: &Element, name: &str, order: &[&str]) -> Option<usize> {
    let preceding = match order.iter().position(|candidate| *candidate == name) {
        Some(rank) => &order[..rank],
        None => return parent.children.iter().rposition(kpom_tree::Node::is_element),
    };
    parent
        .children
        .iter()
        .enumerate()
        .filter_map(|(idx, node)| node.as_element().map(|element| (idx, element)))
        .filter(|(_, element)| preceding.contains(&element.name.as_str()))
        .map(|(idx, _)| idx)
        .last()
}

/// Set the text of `parent/name`, inserting or removing the element as needed
fn upsert_text(parent: &mut Element, name: &str, value: &str, order: &[&str]) {
    if value.is_empty() {
        parent.remove_children_named(name);
        return;
    }
    if let Some(child) = parent.child_mut(name) {
        if child.text().trim() != value {
            child.set_text(value);
        }
        return;
    }
    let anchor = insertion_anchor(parent, name, order);
    parent.insert_element_after(anchor, Element::with_text(name, value));
}

/// Rebuild the list element `list_name` so it holds exactly `entries`
fn replace_list(project: &mut Element, list_name: &str, entries: Vec<Element>) {
    if entries.is_empty() {
        project.remove_children_named(list_name);
        return;
    }
    let list = project.child_or_insert(list_name, |p| insertion_anchor(p, list_name, PROJECT_ORDER));
    list.children.clear();
    list.self_closing = false;
    for entry in entries {
        list.push_element(entry);
    }
}

fn push_text(element: &mut Element, name: &str, value: &str) {
    if !value.is_empty() {
        element.push_element(Element::with_text(name, value));
    }
}

fn repository_element(repository: &RepositoryRef) -> Element {
    let mut element = Element::new("repository");
    push_text(&mut element, "id", &repository.id);
    push_text(&mut element, "name", &repository.name);
    push_text(&mut element, "url", &repository.url);
    element
}

fn dependency_element(dependency: &DependencyRef) -> Element {
    let mut element = Element::new("dependency");
    push_text(&mut element, "groupId", &dependency.group_id);
    push_text(&mut element, "artifactId", &dependency.artifact_id);
    push_text(&mut element, "version", &dependency.version);
    element
}

/// Write the edit model onto `tree`.
///
/// An empty identity field removes the element so a parent reference
/// supplies it. The `parent` element itself is never written.
pub fn apply_to_tree(model: &EditModel, tree: &mut DescriptorTree) {
    let project = &mut tree.root;

    upsert_text(project, "modelVersion", &model.model_version, PROJECT_ORDER);
    upsert_text(project, "groupId", &model.gav.group_id, PROJECT_ORDER);
    upsert_text(project, "artifactId", &model.gav.artifact_id, PROJECT_ORDER);
    upsert_text(project, "version", &model.gav.version, PROJECT_ORDER);
    upsert_text(project, "packaging", PACKAGING, PROJECT_ORDER);
    upsert_text(project, "name", &model.name, PROJECT_ORDER);
    upsert_text(project, "description", &model.description, PROJECT_ORDER);

    replace_list(
        project,
        "repositories",
        model.repositories.iter().map(repository_element).collect(),
    );
    replace_list(
        project,
        "dependencies",
        model.dependencies.iter().map(dependency_element).collect(),
    );

    debug!(
        "Mapped {} onto descriptor ({} repositories, {} dependencies)",
        model.gav,
        model.repositories.len(),
        model.dependencies.len()
    );
}

/// The root must be `<project>` for the tree to be a descriptor
pub fn ensure_project_root(tree: &DescriptorTree) -> Result<(), ModelError> {
    if tree.root.name == "project" {
        Ok(())
    } else {
        Err(ModelError::UnexpectedRoot {
            found: tree.root.name.clone(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Top-level identity field, falling back to the parent reference
fn identity_field(
    project: &Element,
    parent: Option<&Element>,
    field: IdentityField,
) -> Result<String, ModelError> {
    non_blank(project.child_text(field.as_str()))
        .or_else(|| non_blank(parent.and_then(|p| p.child_text(field.as_str()))))
        .ok_or(ModelError::IncompleteIdentity { field })
}

fn read_repository(element: &Element) -> RepositoryRef {
    RepositoryRef {
        id: element.child_text("id").unwrap_or_default(),
        name: element.child_text("name").unwrap_or_default(),
        url: element.child_text("url").unwrap_or_default(),
    }
}

fn read_dependency(element: &Element) -> DependencyRef {
    DependencyRef {
        group_id: element.child_text("groupId").unwrap_or_default(),
        artifact_id: element.child_text("artifactId").unwrap_or_default(),
        version: element.child_text("version").unwrap_or_default(),
    }
}

/// Read the edit model out of a descriptor tree.
///
/// Lists are read in document order without deduplication; nothing is
/// inherited from the parent except missing identity fields.
pub fn to_edit_model(tree: &DescriptorTree) -> Result<EditModel, ModelError> {
    ensure_project_root(tree)?;
    let project = &tree.root;
    let parent = project.child("parent");

    let gav = Gav {
        group_id: identity_field(project, parent, IdentityField::GroupId)?,
        artifact_id: identity_field(project, parent, IdentityField::ArtifactId)?,
        version: identity_field(project, parent, IdentityField::Version)?,
    };

    let repositories = project
        .child("repositories")
        .map(|list| list.children_named("repository").map(read_repository).collect())
        .unwrap_or_default();
    let dependencies = project
        .child("dependencies")
        .map(|list| list.children_named("dependency").map(read_dependency).collect())
        .unwrap_or_default();

    Ok(EditModel {
        name: project.child_text("name").unwrap_or_default(),
        description: project.child_text("description").unwrap_or_default(),
        gav,
        model_version: project.child_text("modelVersion").unwrap_or_default(),
        repositories,
        dependencies,
    })
}
