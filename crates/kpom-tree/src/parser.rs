//! Descriptor text parser
//!
//! A single forward pass over the input that keeps every byte it sees:
//! whitespace between elements becomes text nodes, attribute spacing and
//! quoting are recorded, and entities are stored escaped. The parser checks
//! well-formedness only.

use crate::errors::MalformedDescriptorError;
use crate::escape::{find_malformed_reference, is_name_char, is_name_start};
use crate::node::{Attribute, Element, Node};
use crate::tree::{DescriptorTree, DEFAULT_INDENT};
use tracing::debug;

const BOM: char = '\u{feff}';

/// Parse descriptor text into a [`DescriptorTree`]
pub fn parse(text: &str) -> Result<DescriptorTree, MalformedDescriptorError> {
    let (bom, body) = match text.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parser = Parser::new(body);
    let prolog = parser.parse_misc(false)?;
    if parser.at_end() {
        return Err(parser.error_here("document has no root element"));
    }
    let root = parser.parse_root()?;
    let epilog = parser.parse_misc(true)?;

    let indent = detect_indent(&root);
    let line_ending = if body.contains("\r\n") { "\r\n" } else { "\n" };

    debug!(
        "Parsed descriptor with root <{}> and {} top-level children",
        root.name,
        root.elements().count()
    );

    Ok(DescriptorTree {
        bom,
        prolog,
        root,
        epilog,
        indent,
        line_ending: line_ending.to_string(),
    })
}

/// Indentation unit used in front of the root's first element child
fn detect_indent(root: &Element) -> String {
    let first = root.children.iter().position(Node::is_element);
    let indent = first
        .and_then(|idx| idx.checked_sub(1))
        .and_then(|idx| root.children.get(idx))
        .and_then(|node| match node {
            Node::Text(text) if node.is_whitespace() => {
                text.rfind('\n').map(|nl| text[nl + 1..].to_string())
            }
            _ => None,
        })
        .filter(|indent| !indent.is_empty());

    indent.unwrap_or_else(|| DEFAULT_INDENT.to_string())
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser { src, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> MalformedDescriptorError {
        MalformedDescriptorError::at(self.src, offset, message)
    }

    fn error_here(&self, message: impl Into<String>) -> MalformedDescriptorError {
        self.error_at(self.pos, message)
    }

    fn take_whitespace(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.len() - rest.trim_start().len();
        self.pos += len;
        &rest[..len]
    }

    /// Consume everything up to `terminator`, returning the text before it
    fn take_until(&mut self, terminator: &str, what: &str) -> Result<&'a str, MalformedDescriptorError> {
        let start = self.pos;
        match self.rest().find(terminator) {
            Some(idx) => {
                let content = &self.src[start..start + idx];
                self.pos = start + idx + terminator.len();
                Ok(content)
            }
            None => Err(self.error_at(start, format!("unterminated {what}"))),
        }
    }

    fn parse_name(&mut self) -> Result<&'a str, MalformedDescriptorError> {
        let start = self.pos;
        let mut chars = self.rest().char_indices();
        match chars.next() {
            Some((_, ch)) if is_name_start(ch) => {}
            _ => return Err(self.error_here("expected a name")),
        }
        let len = chars
            .find(|(_, ch)| !is_name_char(*ch))
            .map_or(self.rest().len(), |(idx, _)| idx);
        self.pos += len;
        Ok(&self.src[start..start + len])
    }

    /// Whitespace, comments and processing instructions around the root.
    fn parse_misc(&mut self, after_root: bool) -> Result<Vec<Node>, MalformedDescriptorError> {
        let mut nodes = Vec::new();
        loop {
            let ws = self.take_whitespace();
            if !ws.is_empty() {
                nodes.push(Node::Text(ws.to_string()));
            }
            if self.at_end() {
                return Ok(nodes);
            }

            if self.starts_with("<!--") {
                nodes.push(self.parse_comment()?);
            } else if self.starts_with("<?") {
                nodes.push(self.parse_processing_instruction()?);
            } else if self.starts_with("<!DOCTYPE") {
                if after_root {
                    return Err(self.error_here("DOCTYPE after the root element"));
                }
                nodes.push(self.parse_doctype()?);
            } else if self.starts_with("<") {
                if after_root {
                    return Err(self.error_here("more than one root element"));
                }
                return Ok(nodes);
            } else {
                return Err(self.error_here("text outside the root element"));
            }
        }
    }

    fn parse_comment(&mut self) -> Result<Node, MalformedDescriptorError> {
        self.pos += "<!--".len();
        let content = self.take_until("-->", "comment")?;
        Ok(Node::Comment(content.to_string()))
    }

    fn parse_processing_instruction(&mut self) -> Result<Node, MalformedDescriptorError> {
        let start = self.pos;
        self.pos += "<?".len();
        if self.parse_name().is_err() {
            return Err(self.error_at(start, "processing instruction without a target"));
        }
        self.pos = start + "<?".len();
        let content = self.take_until("?>", "processing instruction")?;
        Ok(Node::ProcessingInstruction(content.to_string()))
    }

    fn parse_cdata(&mut self) -> Result<Node, MalformedDescriptorError> {
        self.pos += "<![CDATA[".len();
        let content = self.take_until("]]>", "CDATA section")?;
        Ok(Node::CData(content.to_string()))
    }

    fn parse_doctype(&mut self) -> Result<Node, MalformedDescriptorError> {
        let start = self.pos;
        self.pos += "<!DOCTYPE".len();
        let body_start = self.pos;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        for (idx, ch) in self.rest().char_indices() {
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '[') => depth += 1,
                (None, ']') => depth = depth.saturating_sub(1),
                (None, '>') if depth == 0 => {
                    let content = &self.src[body_start..body_start + idx];
                    self.pos = body_start + idx + 1;
                    return Ok(Node::Doctype(content.to_string()));
                }
                _ => {}
            }
        }
        Err(self.error_at(start, "unterminated DOCTYPE"))
    }

    fn parse_text(&mut self) -> Result<Node, MalformedDescriptorError> {
        let start = self.pos;
        let len = self.rest().find('<').unwrap_or(self.rest().len());
        let raw = &self.src[start..start + len];
        if let Some(offset) = find_malformed_reference(raw) {
            return Err(self.error_at(start + offset, "malformed entity reference"));
        }
        self.pos += len;
        Ok(Node::Text(raw.to_string()))
    }

    /// Parse a start tag; the flag is true for `<name/>`.
    fn parse_start_tag(&mut self) -> Result<(Element, bool), MalformedDescriptorError> {
        let tag_start = self.pos;
        self.pos += 1;
        let name = self.parse_name()?;
        let mut element = Element::parsed(name.to_string());

        loop {
            let ws = self.take_whitespace();
            match self.peek() {
                None => {
                    return Err(self.error_at(tag_start, format!("unterminated start tag <{name}>")));
                }
                Some('>') => {
                    self.pos += 1;
                    element.tag_padding = ws.to_string();
                    return Ok((element, false));
                }
                Some('/') => {
                    if !self.starts_with("/>") {
                        return Err(self.error_here("expected '/>'"));
                    }
                    self.pos += 2;
                    element.tag_padding = ws.to_string();
                    element.self_closing = true;
                    return Ok((element, true));
                }
                Some(_) => {
                    if ws.is_empty() {
                        return Err(self.error_here("expected whitespace before attribute"));
                    }
                    let attribute = self.parse_attribute(ws)?;
                    if element.attributes.iter().any(|a| a.name == attribute.name) {
                        return Err(self.error_here(format!(
                            "duplicate attribute '{}' on <{name}>",
                            attribute.name
                        )));
                    }
                    element.attributes.push(attribute);
                }
            }
        }
    }

    fn parse_attribute(&mut self, leading: &str) -> Result<Attribute, MalformedDescriptorError> {
        let name = self.parse_name()?;
        let separator_start = self.pos;
        self.take_whitespace();
        if self.peek() != Some('=') {
            return Err(self.error_here(format!("expected '=' after attribute '{name}'")));
        }
        self.pos += 1;
        self.take_whitespace();
        let separator = &self.src[separator_start..self.pos];

        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error_here(format!("attribute '{name}' value must be quoted"))),
        };
        let value_start = self.pos + 1;
        let Some(len) = self.src[value_start..].find(quote) else {
            return Err(self.error_at(value_start, format!("unterminated value for attribute '{name}'")));
        };
        let raw_value = &self.src[value_start..value_start + len];
        if let Some(offset) = raw_value.find('<') {
            return Err(self.error_at(value_start + offset, "'<' in attribute value"));
        }
        if let Some(offset) = find_malformed_reference(raw_value) {
            return Err(self.error_at(value_start + offset, "malformed entity reference"));
        }
        self.pos = value_start + len + 1;

        Ok(Attribute {
            name: name.to_string(),
            raw_value: raw_value.to_string(),
            quote,
            leading: leading.to_string(),
            separator: separator.to_string(),
        })
    }

    fn parse_end_tag(&mut self) -> Result<(&'a str, &'a str), MalformedDescriptorError> {
        self.pos += "</".len();
        let name = self.parse_name()?;
        let padding = self.take_whitespace();
        if self.peek() != Some('>') {
            return Err(self.error_here(format!("expected '>' to close </{name}")));
        }
        self.pos += 1;
        Ok((name, padding))
    }

    /// Parse the root element and everything inside it.
    ///
    /// Open elements live on an explicit stack so deeply nested documents
    /// cannot overflow the call stack.
    fn parse_root(&mut self) -> Result<Element, MalformedDescriptorError> {
        let (root, closed) = self.parse_start_tag()?;
        if closed {
            return Ok(root);
        }

        let mut stack: Vec<Element> = vec![root];
        loop {
            let Some(current) = stack.last_mut() else {
                return Err(self.error_here("element stack underflow"));
            };

            if self.at_end() {
                let message = format!("unexpected end of document: <{}> is not closed", current.name);
                return Err(self.error_here(message));
            }

            if self.starts_with("</") {
                let close_start = self.pos;
                let (name, padding) = self.parse_end_tag()?;
                let Some(mut element) = stack.pop() else {
                    return Err(self.error_at(close_start, "element stack underflow"));
                };
                if element.name != name {
                    return Err(self.error_at(
                        close_start,
                        format!("mismatched end tag: expected </{}>, found </{name}>", element.name),
                    ));
                }
                element.close_padding = padding.to_string();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => return Ok(element),
                }
            } else if self.starts_with("<!--") {
                let node = self.parse_comment()?;
                current.children.push(node);
            } else if self.starts_with("<![CDATA[") {
                let node = self.parse_cdata()?;
                current.children.push(node);
            } else if self.starts_with("<?") {
                let node = self.parse_processing_instruction()?;
                current.children.push(node);
            } else if self.starts_with("<!") {
                return Err(self.error_here("unexpected markup declaration inside element"));
            } else if self.starts_with("<") {
                let (element, closed) = self.parse_start_tag()?;
                if closed {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Element(element));
                    }
                } else {
                    stack.push(element);
                }
            } else {
                let node = self.parse_text()?;
                current.children.push(node);
            }
        }
    }
}
