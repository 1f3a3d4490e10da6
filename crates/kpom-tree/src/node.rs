//! Descriptor tree node types and in-place editing helpers
//!
//! Elements parsed from text keep every byte needed to write them back
//! unchanged: raw (still escaped) text, attribute quoting and spacing, and
//! the whitespace text nodes between children. Elements built in code are
//! marked [`Layout::Pretty`] and get indented by the writer instead.

use crate::escape::{decode_entities, escape_attribute, escape_text};
use smallvec::SmallVec;
use std::borrow::Cow;

/// How the children of an element are laid out on write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Children are written exactly as stored
    Source,
    /// Each element child goes on its own line, indented by nesting depth
    Pretty,
}

/// An attribute with its original formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Value as written between the quotes, entities still escaped
    pub raw_value: String,
    pub quote: char,
    /// Whitespace before the attribute name
    pub leading: String,
    /// Text between the name and the opening quote, `=` included
    pub separator: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: &str) -> Self {
        Attribute {
            name: name.into(),
            raw_value: escape_attribute(value).into_owned(),
            quote: '"',
            leading: " ".to_string(),
            separator: "=".to_string(),
        }
    }

    /// Decoded attribute value
    pub fn value(&self) -> Cow<'_, str> {
        decode_entities(&self.raw_value)
    }
}

/// One node of the descriptor tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, entities still escaped
    Text(String),
    /// Content between `<![CDATA[` and `]]>`
    CData(String),
    /// Content between `<!--` and `-->`
    Comment(String),
    /// Content between `<?` and `?>`
    ProcessingInstruction(String),
    /// Content between `<!DOCTYPE` and the closing `>`
    Doctype(String),
}

impl Node {
    /// Text node holding `value`, escaped
    pub fn text(value: &str) -> Self {
        Node::Text(escape_text(value).into_owned())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// True for text nodes made only of whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(text) if text.chars().all(char::is_whitespace))
    }
}

/// A named element with ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: SmallVec<[Attribute; 4]>,
    pub children: Vec<Node>,
    /// Written as `<name/>` while it has no children
    pub self_closing: bool,
    /// Whitespace between the last attribute and `>` or `/>`
    pub tag_padding: String,
    /// Whitespace between the end tag name and `>`
    pub close_padding: String,
    pub layout: Layout,
}

impl Element {
    /// New element built in code
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: SmallVec::new(),
            children: Vec::new(),
            self_closing: false,
            tag_padding: String::new(),
            close_padding: String::new(),
            layout: Layout::Pretty,
        }
    }

    /// New element holding a single text value
    pub fn with_text(name: impl Into<String>, value: &str) -> Self {
        let mut element = Element::new(name);
        element.set_text(value);
        element
    }

    pub(crate) fn parsed(name: String) -> Self {
        Element {
            layout: Layout::Source,
            ..Element::new(name)
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(Attribute::value)
    }

    /// Set an attribute, keeping the formatting of an existing one
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => {
                attr.raw_value = escape_attribute(value).into_owned();
                attr.quote = '"';
            }
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Element children in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// All element children called `name`
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |element| element.name == name)
    }

    /// First element child called `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|element| element.name == name)
    }

    /// Node index of the first element child called `name`
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(element) if element.name == name))
    }

    /// Decoded character data of this element (text and CDATA)
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(raw) => text.push_str(&decode_entities(raw)),
                Node::CData(data) => text.push_str(data),
                _ => {}
            }
        }
        text
    }

    /// Trimmed text of the first child called `name`
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|child| child.text().trim().to_string())
    }

    /// Replace all children with a single text value
    pub fn set_text(&mut self, value: &str) {
        self.children.clear();
        if !value.is_empty() {
            self.children.push(Node::text(value));
        }
        self.self_closing = false;
    }

    /// Insert `child` right after the element node at `anchor`, or before
    /// the first element child when `anchor` is `None`.
    ///
    /// Parsed elements get the same indentation their existing children use.
    /// Returns the node index of the inserted element.
    pub fn insert_element_after(&mut self, anchor: Option<usize>, child: Element) -> usize {
        let Some(first) = self.children.iter().position(Node::is_element) else {
            if self.children.iter().all(Node::is_whitespace) {
                self.children.clear();
                self.layout = Layout::Pretty;
            }
            self.children.push(Node::Element(child));
            return self.children.len() - 1;
        };

        let indent = match self.layout {
            Layout::Pretty => None,
            Layout::Source => self.indentation_before(anchor.unwrap_or(first)),
        };

        match anchor {
            Some(anchor) => {
                let mut at = anchor + 1;
                if let Some(indent) = indent {
                    self.children.insert(at, Node::Text(indent));
                    at += 1;
                }
                self.children.insert(at, Node::Element(child));
                at
            }
            None => {
                self.children.insert(first, Node::Element(child));
                if let Some(indent) = indent {
                    self.children.insert(first + 1, Node::Text(indent));
                }
                first
            }
        }
    }

    /// Append `child` after the last element child
    pub fn push_element(&mut self, child: Element) -> usize {
        let last = self.children.iter().rposition(Node::is_element);
        match last {
            Some(last) => self.insert_element_after(Some(last), child),
            None => self.insert_element_after(None, child),
        }
    }

    /// First child called `name`, created after the node chosen by `anchor`
    /// when missing
    pub fn child_or_insert(
        &mut self,
        name: &str,
        anchor: impl FnOnce(&Element) -> Option<usize>,
    ) -> &mut Element {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                let after = anchor(self);
                self.insert_element_after(after, Element::new(name))
            }
        };
        match &mut self.children[index] {
            Node::Element(child) => child,
            _ => unreachable!("position_of and insert_element_after return element indices"),
        }
    }

    /// Remove the node at `index` along with the indentation in front of it
    pub fn remove_node(&mut self, index: usize) -> Option<Node> {
        if index >= self.children.len() {
            return None;
        }
        let removed = self.children.remove(index);
        if index > 0 && self.children[index - 1].is_whitespace() {
            self.children.remove(index - 1);
        }
        Some(removed)
    }

    /// Remove every element child called `name`, returning how many went
    pub fn remove_children_named(&mut self, name: &str) -> usize {
        let mut removed = 0;
        while let Some(index) = self.position_of(name) {
            self.remove_node(index);
            removed += 1;
        }
        removed
    }

    /// Line break plus indentation found in front of the node at `index`
    fn indentation_before(&self, index: usize) -> Option<String> {
        let previous = index.checked_sub(1).and_then(|i| self.children.get(i))?;
        let Node::Text(text) = previous else {
            return None;
        };
        if !previous.is_whitespace() {
            return None;
        }
        let newline = text.rfind('\n')?;
        let line_break = if text[..newline].ends_with('\r') {
            "\r\n"
        } else {
            "\n"
        };
        Some(format!("{}{}", line_break, &text[newline + 1..]))
    }
}

#[cfg(test)]
mod tests {
    use crate::node::*;

    fn parsed_list() -> Element {
        let mut list = Element::parsed("list".to_string());
        list.children = vec![
            Node::Text("\n    ".to_string()),
            Node::Element(Element::with_text("a", "1")),
            Node::Text("\n    ".to_string()),
            Node::Element(Element::with_text("b", "2")),
            Node::Text("\n  ".to_string()),
        ];
        list
    }

    #[test]
    fn test_child_text_is_trimmed_and_decoded() {
        let mut element = Element::new("name");
        element.children.push(Node::Text("  R&amp;D  ".to_string()));
        let mut parent = Element::new("project");
        parent.children.push(Node::Element(element));
        assert_eq!(parent.child_text("name").as_deref(), Some("R&D"));
        assert_eq!(parent.child_text("missing"), None);
    }

    #[test]
    fn test_insert_after_mimics_indentation() {
        let mut list = parsed_list();
        let index = list.insert_element_after(Some(1), Element::with_text("c", "3"));
        assert_eq!(index, 3);
        assert_eq!(list.children[2], Node::Text("\n    ".to_string()));
        assert_eq!(list.children.len(), 7);
        assert_eq!(list.children[6], Node::Text("\n  ".to_string()));
    }

    #[test]
    fn test_insert_before_first_element() {
        let mut list = parsed_list();
        let index = list.insert_element_after(None, Element::with_text("z", "0"));
        assert_eq!(index, 1);
        let names: Vec<&str> = list.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "b"]);
        assert_eq!(list.children[2], Node::Text("\n    ".to_string()));
    }

    #[test]
    fn test_push_into_empty_element_switches_to_pretty() {
        let mut build = Element::parsed("build".to_string());
        build.children.push(Node::Text("\n  ".to_string()));
        build.self_closing = true;
        build.push_element(Element::new("plugins"));
        assert_eq!(build.layout, Layout::Pretty);
        assert_eq!(build.children.len(), 1);
    }

    #[test]
    fn test_remove_children_named_drops_indentation() {
        let mut list = parsed_list();
        assert_eq!(list.remove_children_named("a"), 1);
        assert_eq!(list.children.len(), 3);
        assert_eq!(list.child_text("b").as_deref(), Some("2"));
        assert_eq!(list.remove_children_named("a"), 0);
    }

    #[test]
    fn test_child_or_insert() {
        let mut list = parsed_list();
        list.child_or_insert("b", |_| None).set_text("20");
        assert_eq!(list.child_text("b").as_deref(), Some("20"));

        list.child_or_insert("c", |e| e.position_of("a")).set_text("3");
        let names: Vec<&str> = list.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "c", "b"]);
    }

    #[test]
    fn test_set_attribute_updates_in_place() {
        let mut element = Element::new("project").with_attribute("xmlns", "urn:a");
        element.set_attribute("xmlns", "urn:b");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attribute("xmlns").as_deref(), Some("urn:b"));
    }
}
