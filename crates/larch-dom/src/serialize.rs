//! HTML serialization of subtrees.
//!
//! A simplified form of the [HTML fragment serialization algorithm]: text is
//! written as-is, attribute values only escape `"`, and void elements get a
//! start tag alone.
//!
//! [HTML fragment serialization algorithm]: https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments

use crate::element::ElementData;
use crate::error::DomResult;
use crate::node::{NodeId, NodeKind};
use crate::tree::DomTree;

impl DomTree {
    /// The serialized children of `id`.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`](crate::DomError::UnknownNode) for foreign handles.
    pub fn inner_html(&self, id: NodeId) -> DomResult<String> {
        let _ = self.node(id)?;
        let mut out = String::new();
        for &child in self.children(id) {
            self.serialize_node(child, &mut out);
        }
        Ok(out)
    }

    /// The serialized node itself, including its children.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`](crate::DomError::UnknownNode) for foreign handles.
    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        let _ = self.node(id)?;
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        Ok(out)
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        let mut pending = vec![Step::Open(id)];
        while let Some(step) = pending.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(tag) => {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                    continue;
                }
            };
            let Some(node) = self.get(id) else {
                continue;
            };
            match &node.kind {
                NodeKind::Element(element) => {
                    write_start_tag(element, out);
                    if element.is_void() {
                        continue;
                    }
                    pending.push(Step::Close(element.tag_name()));
                    pending.extend(node.children.iter().rev().map(|&child| Step::Open(child)));
                }
                NodeKind::Text(data) => out.push_str(data.data()),
                NodeKind::Comment(data) => {
                    out.push_str("<!--");
                    out.push_str(data.data());
                    out.push_str("-->");
                }
                NodeKind::DocumentType(doctype) => {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(&doctype.name);
                    out.push('>');
                }
                NodeKind::Document | NodeKind::DocumentFragment => {
                    pending.extend(node.children.iter().rev().map(|&child| Step::Open(child)));
                }
            }
        }
    }
}

/// Serializer work item: a node still to write, or an end tag owed.
enum Step<'a> {
    Open(NodeId),
    Close(&'a str),
}

fn write_start_tag(element: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(element.tag_name());
    for attr in element.attributes() {
        out.push(' ');
        out.push_str(attr.name());
        if !attr.value().is_empty() {
            out.push_str("=\"");
            out.push_str(&attr.value().replace('"', "&quot;"));
            out.push('"');
        }
    }
    out.push('>');
}
