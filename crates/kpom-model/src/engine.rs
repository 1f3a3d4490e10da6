//! Render, merge and decode entry points

use crate::errors::ModelError;
use crate::mapper::{apply_to_tree, ensure_project_root, new_project_tree, to_edit_model};
use crate::plugin::ensure_plugin;
use crate::types::EditModel;
use kpom_config::{packaged_plugin_spec, PluginSpec};
use kpom_tree::DescriptorTree;
use tracing::debug;

/// Produces descriptor text from edit models.
///
/// Holds the plugin spec that every produced descriptor must declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEngine {
    plugin: PluginSpec,
}

impl Default for DescriptorEngine {
    fn default() -> Self {
        DescriptorEngine::packaged()
    }
}

impl DescriptorEngine {
    pub fn new(plugin: PluginSpec) -> Self {
        DescriptorEngine { plugin }
    }

    /// Engine using the plugin version packaged with the crate
    pub fn packaged() -> Self {
        DescriptorEngine::new(packaged_plugin_spec().clone())
    }

    pub fn plugin(&self) -> &PluginSpec {
        &self.plugin
    }

    /// Descriptor for a new project with no prior document.
    ///
    /// Fails when the model's identity is incomplete.
    pub fn render(&self, model: &EditModel) -> Result<String, ModelError> {
        model.gav.validate()?;
        let mut tree = new_project_tree();
        self.apply(model, &mut tree);
        Ok(tree.write())
    }

    /// Apply `model` onto `original`, keeping everything it does not map.
    ///
    /// The caller is expected to pass a model with a complete identity; a
    /// blank identity field removes that element from the descriptor.
    pub fn merge(&self, model: &EditModel, original: &str) -> Result<String, ModelError> {
        let mut tree = DescriptorTree::parse(original)?;
        ensure_project_root(&tree)?;
        self.apply(model, &mut tree);
        let merged = tree.write();
        debug!(
            "Merged {} into descriptor ({} -> {} bytes)",
            model.gav,
            original.len(),
            merged.len()
        );
        Ok(merged)
    }

    /// Read the edit model from descriptor text
    pub fn decode(&self, text: &str) -> Result<EditModel, ModelError> {
        decode(text)
    }

    fn apply(&self, model: &EditModel, tree: &mut DescriptorTree) {
        apply_to_tree(model, tree);
        ensure_plugin(tree, &self.plugin);
    }
}

/// Read the edit model from descriptor text
pub fn decode(text: &str) -> Result<EditModel, ModelError> {
    let tree = DescriptorTree::parse(text)?;
    to_edit_model(&tree)
}
