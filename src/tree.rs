//! Element tree over a normalized OFX document.
//!
//! Only the parts of XPath the statement reader needs are supported: absolute
//! child paths (`/OFX/SIGNONMSGSRSV1/SONRS`), direct children, and descendant
//! lookups by element name. Attributes are dropped; OFX does not use them.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// A single element with its trimmed text and child elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element text, `None` when the element has no text of its own.
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Node::text)
    }

    /// Resolve a `/`-separated child path relative to this element.
    ///
    /// When several children share a name every branch is tried in
    /// document order, so the first complete match wins.
    pub fn select(&self, path: &str) -> Option<&Node> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.select_segments(&segments)
    }

    fn select_segments(&self, segments: &[&str]) -> Option<&Node> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };

        self.children
            .iter()
            .filter(|child| child.name == *first)
            .find_map(|child| child.select_segments(rest))
    }

    /// First descendant with the given name, depth first.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.children.iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find(name)
            }
        })
    }

    /// Every descendant with the given name, in document order.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a Node> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }
}

/// Deepest element nesting accepted by [`Tree::parse`]. OFX statements stay
/// well under a dozen levels.
pub const MAX_DEPTH: usize = 256;

/// A parsed document. The root is an unnamed node holding the top-level
/// elements, so absolute paths start with the document element's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    /// Build a tree from well-formed XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack = vec![Node::default()];

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    if stack.len() > MAX_DEPTH {
                        return Err(Error::XmlError(format!(
                            "elements nested deeper than {} levels",
                            MAX_DEPTH
                        )));
                    }
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    stack.push(Node::new(name));
                }
                Event::Empty(empty) => {
                    let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                    current(&mut stack)?.children.push(Node::new(name));
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(Error::XmlError("unexpected closing tag".to_string()));
                    }
                    if let Some(node) = stack.pop() {
                        current(&mut stack)?.children.push(node);
                    }
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::XmlError(e.to_string()))?;
                    current(&mut stack)?.text.push_str(&text);
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    current(&mut stack)?
                        .text
                        .push_str(String::from_utf8_lossy(&data).trim());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(Error::XmlError(format!(
                "{} element(s) left unclosed",
                stack.len() - 1
            )));
        }

        let root = stack.pop().unwrap_or_default();
        if root.children.is_empty() {
            return Err(Error::XmlError("document has no elements".to_string()));
        }

        Ok(Tree { root })
    }

    /// Resolve an absolute path such as `/OFX/SIGNONMSGSRSV1/SONRS`.
    pub fn select(&self, path: &str) -> Option<&Node> {
        self.root.select(path)
    }

}

fn current(stack: &mut [Node]) -> Result<&mut Node> {
    stack
        .last_mut()
        .ok_or_else(|| Error::XmlError("element stack underflow".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<OFX><A><B>one</B><B>two</B><C><B>three</B></C></A><D>x &amp; y</D></OFX>";

    #[test]
    fn test_select_absolute_path() {
        let tree = Tree::parse(SAMPLE).unwrap();
        assert_eq!(tree.select("/OFX/A/B").and_then(Node::text), Some("one"));
        assert_eq!(tree.select("/OFX/A/C/B").and_then(Node::text), Some("three"));
        assert!(tree.select("/OFX/A/X").is_none());
        assert!(tree.select("/A").is_none());
    }

    #[test]
    fn test_select_tries_every_branch() {
        let tree = Tree::parse("<OFX><S><X>1</X></S><S><Y>2</Y></S></OFX>").unwrap();
        assert_eq!(tree.select("/OFX/S/Y").and_then(Node::text), Some("2"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let tree = Tree::parse(SAMPLE).unwrap();
        let ofx = tree.select("/OFX").unwrap();
        let texts: Vec<_> = ofx.descendants("B").into_iter().filter_map(Node::text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(
            ofx.find("C").and_then(|c| c.child_text("B")),
            Some("three")
        );
        assert_eq!(ofx.find("B").and_then(Node::text), Some("one"));
    }

    #[test]
    fn test_text_is_unescaped_and_trimmed() {
        let tree = Tree::parse("<OFX>\n  <D>  x &amp; y  </D>\n</OFX>").unwrap();
        assert_eq!(tree.select("/OFX/D").and_then(Node::text), Some("x & y"));
        assert_eq!(tree.select("/OFX").and_then(Node::text), None);
    }

    #[test]
    fn test_declarations_are_skipped() {
        let xml = "<?xml version=\"1.0\"?>\n<?OFX OFXHEADER=\"200\" VERSION=\"220\"?>\n<OFX><E/></OFX>";
        let tree = Tree::parse(xml).unwrap();
        assert!(tree.select("/OFX/E").is_some());
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(matches!(Tree::parse("<OFX><A></OFX>"), Err(Error::XmlError(_))));
        assert!(matches!(Tree::parse("<OFX><A>"), Err(Error::XmlError(_))));
        assert!(matches!(Tree::parse("   "), Err(Error::XmlError(_))));
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<A>".repeat(depth), "</A>".repeat(depth))
    }

    #[test]
    fn test_nesting_depth_is_limited() {
        assert!(Tree::parse(&nested(MAX_DEPTH)).is_ok());
        assert!(matches!(
            Tree::parse(&nested(MAX_DEPTH + 1)),
            Err(Error::XmlError(_))
        ));
        assert!(matches!(
            Tree::parse(&nested(200_000)),
            Err(Error::XmlError(_))
        ));
    }
}
