//! Descriptor tree serialization

use crate::node::{Element, Layout, Node};
use crate::tree::DescriptorTree;

/// Serialize a tree back to text.
///
/// Parsed content is emitted exactly as it was read; [`Layout::Pretty`]
/// elements are indented with the tree's indentation unit.
pub fn write(tree: &DescriptorTree) -> String {
    let mut writer = Writer {
        out: String::with_capacity(4096),
        indent: &tree.indent,
        line_ending: &tree.line_ending,
    };

    if tree.bom {
        writer.out.push('\u{feff}');
    }
    for node in &tree.prolog {
        writer.node(node, 0);
    }
    writer.element(&tree.root, 0);
    for node in &tree.epilog {
        writer.node(node, 0);
    }
    writer.out
}

struct Writer<'t> {
    out: String,
    indent: &'t str,
    line_ending: &'t str,
}

impl Writer<'_> {
    fn node(&mut self, node: &Node, depth: usize) {
        match node {
            Node::Element(element) => self.element(element, depth),
            Node::Text(raw) => self.out.push_str(raw),
            Node::CData(data) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(data);
                self.out.push_str("]]>");
            }
            Node::Comment(comment) => {
                self.out.push_str("<!--");
                self.out.push_str(comment);
                self.out.push_str("-->");
            }
            Node::ProcessingInstruction(content) => {
                self.out.push_str("<?");
                self.out.push_str(content);
                self.out.push_str("?>");
            }
            Node::Doctype(content) => {
                self.out.push_str("<!DOCTYPE");
                self.out.push_str(content);
                self.out.push('>');
            }
        }
    }

    fn element(&mut self, element: &Element, depth: usize) {
        self.out.push('<');
        self.out.push_str(&element.name);
        for attr in &element.attributes {
            self.out.push_str(&attr.leading);
            self.out.push_str(&attr.name);
            self.out.push_str(&attr.separator);
            self.out.push(attr.quote);
            self.out.push_str(&attr.raw_value);
            self.out.push(attr.quote);
        }
        self.out.push_str(&element.tag_padding);

        if element.children.is_empty() && element.self_closing {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');

        let pretty = element.layout == Layout::Pretty && element.children.iter().any(Node::is_element);
        for child in &element.children {
            if pretty {
                self.line(depth + 1);
            }
            self.node(child, depth + 1);
        }
        if pretty {
            self.line(depth);
        }

        self.out.push_str("</");
        self.out.push_str(&element.name);
        self.out.push_str(&element.close_padding);
        self.out.push('>');
    }

    fn line(&mut self, depth: usize) {
        self.out.push_str(self.line_ending);
        for _ in 0..depth {
            self.out.push_str(self.indent);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Element;
    use crate::parser::parse;
    use crate::tree::DescriptorTree;
    use crate::writer::*;

    #[test]
    fn test_parsed_document_writes_back_unchanged() {
        let text = "<?xml version=\"1.0\"?>\n<!-- head -->\n<a  x='1' >\r\n <b/>text &amp; more<c ></c ><![CDATA[<raw>]]></a>\n";
        let result = parse(text);
        assert!(result.is_ok());
        let Ok(tree) = result else { return };
        assert_eq!(write(&tree), text);
    }

    #[test]
    fn test_pretty_elements_are_indented() {
        let mut root = Element::new("project");
        let mut deps = Element::new("dependencies");
        deps.push_element(Element::with_text("dependency", "x"));
        root.push_element(Element::with_text("name", "demo"));
        root.push_element(deps);

        let text = write(&DescriptorTree::new(root));
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project>\n  <name>demo</name>\n  <dependencies>\n    <dependency>x</dependency>\n  </dependencies>\n</project>\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_pretty_child_inside_parsed_element() {
        let result = parse("<project>\n    <name>demo</name>\n</project>");
        assert!(result.is_ok());
        let Ok(mut tree) = result else { return };
        let mut build = Element::new("build");
        build.push_element(Element::with_text("finalName", "demo"));
        tree.root.push_element(build);
        assert_eq!(
            write(&tree),
            "<project>\n    <name>demo</name>\n    <build>\n        <finalName>demo</finalName>\n    </build>\n</project>"
        );
    }

    #[test]
    fn test_empty_elements() {
        let mut root = Element::new("a");
        root.push_element(Element::new("b"));
        let mut closed = Element::new("c");
        closed.self_closing = true;
        root.push_element(closed);
        let mut tree = DescriptorTree::new(root);
        tree.prolog.clear();
        tree.epilog.clear();
        assert_eq!(write(&tree), "<a>\n  <b></b>\n  <c/>\n</a>");
    }
}
