//! The document-level tree: prolog, root element, epilog

use crate::errors::MalformedDescriptorError;
use crate::node::{Element, Node};
use std::fmt;
use std::str::FromStr;

/// Indentation used when a document gives no hint
pub const DEFAULT_INDENT: &str = "  ";

/// XML declaration written at the top of new documents
pub const XML_DECLARATION: &str = r#"xml version="1.0" encoding="UTF-8""#;

/// A whole descriptor document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorTree {
    /// Input started with a byte order mark
    pub bom: bool,
    /// Nodes before the root: XML declaration, comments, doctype, whitespace
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Nodes after the root
    pub epilog: Vec<Node>,
    /// Indentation unit for synthesized elements
    pub indent: String,
    pub line_ending: String,
}

impl DescriptorTree {
    /// New document with an UTF-8 XML declaration
    pub fn new(root: Element) -> Self {
        DescriptorTree {
            bom: false,
            prolog: vec![
                Node::ProcessingInstruction(XML_DECLARATION.to_string()),
                Node::Text("\n".to_string()),
            ],
            root,
            epilog: vec![Node::Text("\n".to_string())],
            indent: DEFAULT_INDENT.to_string(),
            line_ending: "\n".to_string(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, MalformedDescriptorError> {
        crate::parser::parse(text)
    }

    pub fn write(&self) -> String {
        crate::writer::write(self)
    }

    /// Encoding named by the XML declaration, if any
    pub fn declared_encoding(&self) -> Option<String> {
        self.prolog.iter().find_map(|node| match node {
            Node::ProcessingInstruction(content) if content.starts_with("xml ") => {
                pseudo_attribute(content, "encoding")
            }
            _ => None,
        })
    }
}

impl FromStr for DescriptorTree {
    type Err = MalformedDescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DescriptorTree::parse(s)
    }
}

impl fmt::Display for DescriptorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write())
    }
}

fn pseudo_attribute(declaration: &str, name: &str) -> Option<String> {
    let start = declaration.find(&format!("{name}="))? + name.len() + 1;
    let rest = &declaration[start..];
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let end = value.find(quote)?;
    Some(value[..end].to_string())
}
