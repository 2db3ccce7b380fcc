//! A small element tree built on top of the `xml-rs` event stream.
//!
//! # Why build a tree? (for beginners)
//!
//! `xml-rs` hands out one event at a time (`StartElement`, `Characters`,
//! `EndElement`, …).  Translation files are a few hundred kilobytes at most,
//! so collecting the events into a tree first and then walking it keeps the
//! `.ts` and `Languages.xml` readers short and declarative.  Each element
//! remembers the line and column where it started so the readers can point
//! at the offending element when something required is missing.
//!
//! The tree is strict: any well-formedness error from `xml-rs` (unclosed
//! tag, mismatched end tag, truncated stream) aborts the read.

use std::io::Read;

use xml::common::Position as _;
use xml::reader::{ParserConfig, XmlEvent};

use crate::resource::error::{CatalogParseError, Position};

/// Deepest element nesting accepted.  Real catalogs nest about five levels.
pub const MAX_DEPTH: usize = 64;

/// Number of leading bytes kept by [`HeadRecorder`].
const HEAD_LEN: usize = 8;

/// Child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Where the start tag begins.
    pub position: Position,
}

impl Element {
    fn new(name: String, attributes: Vec<(String, String)>, position: Position) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
            position,
        }
    }

    /// Appends character data, merging with a preceding text node.
    fn push_text(&mut self, text: String) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }

    /// The value of attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// The first child element called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// Character content of this element.
    ///
    /// Qt Linguist writes characters that XML 1.0 cannot carry as
    /// `<byte value="x1b"/>`; those are decoded in place.  Other child
    /// elements contribute nothing.
    pub fn text(&self) -> Result<String, CatalogParseError> {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) if element.name == "byte" => out.push(element.byte_value()?),
                Node::Element(_) => {}
            }
        }
        Ok(out)
    }

    /// Decodes the `value` of a `<byte>` escape: `x` + hex, or decimal.
    fn byte_value(&self) -> Result<char, CatalogParseError> {
        let raw = self
            .attribute("value")
            .ok_or(CatalogParseError::MissingAttribute {
                element: "byte",
                attribute: "value",
                position: self.position,
            })?;
        let parsed = match raw.strip_prefix('x').or_else(|| raw.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        parsed
            .and_then(char::from_u32)
            .ok_or_else(|| CatalogParseError::InvalidAttribute {
                element: "byte",
                attribute: "value",
                value: raw.to_string(),
                position: self.position,
            })
    }
}

/// Passes reads through and keeps the first few bytes of the stream.
struct HeadRecorder<R> {
    inner: R,
    head: Vec<u8>,
}

impl<R: Read> Read for HeadRecorder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if self.head.len() < HEAD_LEN {
            let take = (HEAD_LEN - self.head.len()).min(n);
            self.head.extend_from_slice(&buf[..take]);
        }
        Ok(n)
    }
}

/// Whether the document's first token is an element start tag, with no
/// declaration, doctype, comment or whitespace before it.
///
/// `xml-rs` reports such a root element at the end of its start tag rather
/// than at its `<`, so the reader pins it to 1:1 instead.
fn opens_with_start_tag(head: &[u8]) -> bool {
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    match head {
        [b'<', next, ..] => !matches!(next, b'?' | b'!' | b'/'),
        _ => false,
    }
}

fn to_position(position: xml::common::TextPosition) -> Position {
    Position::new(position.row + 1, position.column + 1)
}

/// Reads a whole XML document and returns its root element.
///
/// # Errors
///
/// [`CatalogParseError::Xml`] for anything `xml-rs` rejects, including an
/// empty document, and for elements nested deeper than [`MAX_DEPTH`].
pub fn read_document<R: Read>(source: R) -> Result<Element, CatalogParseError> {
    let mut reader = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true)
        .create_reader(HeadRecorder {
            inner: source,
            head: Vec::with_capacity(HEAD_LEN),
        });

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.next().map_err(|e| CatalogParseError::Xml {
            position: to_position(e.position()),
            message: e.to_string(),
        })?;

        match event {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                if stack.len() >= MAX_DEPTH {
                    return Err(CatalogParseError::Xml {
                        position: to_position(reader.position()),
                        message: "elements nested too deeply".to_string(),
                    });
                }
                let position = if stack.is_empty()
                    && root.is_none()
                    && opens_with_start_tag(&reader.source().head)
                {
                    Position::new(1, 1)
                } else {
                    to_position(reader.position())
                };
                let attributes = attributes
                    .into_iter()
                    .map(|attribute| (attribute.name.local_name, attribute.value))
                    .collect();
                stack.push(Element::new(name.local_name, attributes, position));
            }
            XmlEvent::EndElement { .. } => {
                let Some(finished) = stack.pop() else {
                    return Err(CatalogParseError::Xml {
                        position: to_position(reader.position()),
                        message: "end tag without a matching start tag".to_string(),
                    });
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(finished)),
                    None => root = Some(finished),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) | XmlEvent::Whitespace(text) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(text);
                }
            }
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }

    root.ok_or_else(|| CatalogParseError::Xml {
        position: to_position(reader.position()),
        message: "document has no root element".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str) -> Result<Element, CatalogParseError> {
        read_document(xml.as_bytes())
    }

    #[test]
    fn test_read_builds_tree_with_attributes() {
        // Arrange
        let xml = r#"<TS language="cs-CZ"><context><name>AboutDialog</name></context></TS>"#;

        // Act
        let root = read(xml).unwrap();

        // Assert
        assert_eq!(root.name, "TS");
        assert_eq!(root.attribute("language"), Some("cs-CZ"));
        assert_eq!(root.attribute("version"), None);
        let context = root.child("context").unwrap();
        assert_eq!(context.child("name").unwrap().text().unwrap(), "AboutDialog");
    }

    #[test]
    fn test_text_decodes_entities_and_keeps_whitespace() {
        let root = read("<source>  A&amp;liases &lt;b&gt;\n</source>").unwrap();
        assert_eq!(root.text().unwrap(), "  A&liases <b>\n");
    }

    #[test]
    fn test_text_decodes_byte_escapes() {
        let root = read(r#"<t>a<byte value="x1b"/>b<byte value="9"/>c</t>"#).unwrap();
        assert_eq!(root.text().unwrap(), "a\u{1b}b\tc");
    }

    #[test]
    fn test_invalid_byte_escape_is_rejected() {
        let root = read(r#"<t><byte value="xZZ"/></t>"#).unwrap();
        let err = root.text().unwrap_err();
        assert!(matches!(
            err,
            CatalogParseError::InvalidAttribute { element: "byte", .. }
        ));
    }

    #[test]
    fn test_positions_are_one_based() {
        let root = read("<TS>\n  <context/>\n</TS>").unwrap();
        assert_eq!(root.position, Position::new(1, 1));
        assert_eq!(root.child("context").unwrap().position, Position::new(2, 3));
    }

    #[test]
    fn test_root_position_after_prolog() {
        let root = read("<?xml version=\"1.0\"?>\n<TS>\n  <context/>\n</TS>").unwrap();
        assert_eq!(root.position, Position::new(2, 1));
        assert_eq!(root.child("context").unwrap().position, Position::new(3, 3));
    }

    #[test]
    fn test_root_position_after_byte_order_mark() {
        let root = read("\u{feff}<languages><language/></languages>").unwrap();
        assert_eq!(root.position, Position::new(1, 1));
    }

    #[test]
    fn test_opens_with_start_tag() {
        assert!(opens_with_start_tag(b"<TS>"));
        assert!(opens_with_start_tag(b"\xEF\xBB\xBF<TS"));
        assert!(!opens_with_start_tag(b"<?xml ve"));
        assert!(!opens_with_start_tag(b"<!DOCTYP"));
        assert!(!opens_with_start_tag(b" <TS>"));
        assert!(!opens_with_start_tag(b""));
    }

    #[test]
    fn test_nesting_at_limit_is_accepted() {
        let xml = format!("{}{}", "<x>".repeat(MAX_DEPTH), "</x>".repeat(MAX_DEPTH));
        assert!(read(&xml).is_ok());
    }

    #[test]
    fn test_deep_nesting_is_rejected_without_overflow() {
        // Arrange
        let depth = 50_000;
        let xml = format!("<TS>{}{}</TS>", "<x>".repeat(depth), "</x>".repeat(depth));

        // Act
        let err = read(&xml).unwrap_err();

        // Assert
        match err {
            CatalogParseError::Xml { position, message } => {
                assert_eq!(position.line, 1);
                assert_eq!(message, "elements nested too deeply");
            }
            other => panic!("expected an XML error, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        let err = read("<TS><context><name>x</name>").unwrap_err();
        assert!(matches!(err, CatalogParseError::Xml { .. }));
    }

    #[test]
    fn test_mismatched_end_tag_is_an_error() {
        let err = read("<TS><message></context></TS>").unwrap_err();
        let position = err.position();
        assert_eq!(position.line, 1);
        assert!(matches!(err, CatalogParseError::Xml { .. }));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        assert!(matches!(read(""), Err(CatalogParseError::Xml { .. })));
    }

    #[test]
    fn test_comments_are_ignored() {
        let root = read("<t>a<!-- note -->b</t>").unwrap();
        assert_eq!(root.text().unwrap(), "ab");
    }
}
