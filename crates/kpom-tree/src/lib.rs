//! Lossless descriptor tree
//!
//! Parses project descriptor (pom.xml) text into an ordered, mutable tree
//! and writes it back. Whatever the tree was not asked to change is written
//! exactly as it was read, so unknown sections, comments and formatting
//! survive an edit.

pub mod errors;
pub mod escape;
pub mod node;
pub mod parser;
pub mod tree;
pub mod writer;

pub use errors::MalformedDescriptorError;
pub use node::{Attribute, Element, Layout, Node};
pub use parser::parse;
pub use tree::{DescriptorTree, DEFAULT_INDENT};
pub use writer::write;
