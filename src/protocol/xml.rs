//! Lookups on `roxmltree` documents for the room protocol.
//!
//! Frames arrive one element at a time, so each one is parsed as its own
//! document. Missing elements and attributes become `ProtocolError::Missing`
//! naming the parent.

use roxmltree::{Document, Node};

use crate::errors::ProtocolError;

pub use quick_xml::escape::escape;

/// Parse one framed element. Surrounding whitespace between frames is
/// dropped first.
pub fn parse_document(xml: &str) -> Result<Document<'_>, ProtocolError> {
    Ok(Document::parse(xml.trim())?)
}

/// First child element called `name`.
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

pub fn require_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Result<Node<'a, 'input>, ProtocolError> {
    child(node, name)
        .ok_or_else(|| ProtocolError::Missing(format!("<{name}> in <{}>", node.tag_name().name())))
}

pub fn require_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, ProtocolError> {
    node.attribute(name).ok_or_else(|| {
        ProtocolError::Missing(format!("attribute {name} on <{}>", node.tag_name().name()))
    })
}

/// Text content of a leaf element, empty when it has none.
pub fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or_default().trim()
}
