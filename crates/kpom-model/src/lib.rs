//! kjar project descriptor editing
//!
//! This crate maps the workbench's [`EditModel`] onto a project descriptor
//! (`pom.xml`) and back. Edits are merged into the original document so
//! that anything the model does not cover survives, and every produced
//! descriptor declares the kie-maven-plugin.
//!
//! ```no_run
//! use kpom_model::{DescriptorEngine, EditModel, Gav};
//!
//! let engine = DescriptorEngine::packaged();
//! let model = EditModel::new(Gav::new("org.acme", "demo", "1.0"));
//! let pom = engine.render(&model)?;
//! assert_eq!(kpom_model::decode(&pom)?, model);
//! # Ok::<(), kpom_model::ModelError>(())
//! ```

pub mod engine;
pub mod errors;
pub mod mapper;
pub mod plugin;
pub mod types;

pub use engine::{decode, DescriptorEngine};
pub use errors::ModelError;
pub use mapper::{apply_to_tree, to_edit_model, PACKAGING};
pub use plugin::{declared_plugins, ensure_plugin};
pub use types::{DependencyRef, EditModel, Gav, IdentityField, RepositoryRef, DEFAULT_MODEL_VERSION};

pub use kpom_config::PluginSpec;
