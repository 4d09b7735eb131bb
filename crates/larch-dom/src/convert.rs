//! Conversion of an externally parsed tree into arena nodes.
//!
//! This is the only bulk-construction path: whole-document loads,
//! `inner_html` assignment and `create_fragment` all end up here.

use crate::character_data::CharacterData;
use crate::document::Document;
use crate::element::ElementData;
use crate::node::{DocumentTypeData, NodeId, NodeKind};
use crate::source::{ParsedDocument, ParsedNode};

/// Elements whose whitespace-only text children are kept.
const WHITESPACE_PRESERVING: [&str; 4] = ["pre", "textarea", "script", "style"];

impl Document {
    /// Build the document's children from a parsed document: the doctype
    /// first, then the root element.
    pub(crate) fn convert_document(&mut self, parsed: ParsedDocument) {
        if let Some(name) = parsed.doctype {
            let _ = self.append_new(
                NodeId::ROOT,
                NodeKind::DocumentType(DocumentTypeData { name }),
            );
        }
        match parsed.root {
            Some(root) => self.convert_nodes(vec![root], NodeId::ROOT),
            None => tracing::warn!("parsed document has no root element"),
        }
    }

    /// Append converted `nodes` (and their subtrees) to `parent`, in order.
    pub(crate) fn convert_nodes(&mut self, nodes: Vec<ParsedNode>, parent: NodeId) {
        let preserve = self
            .tree()
            .as_element(parent)
            .is_some_and(|e| WHITESPACE_PRESERVING.contains(&e.tag_name()));
        let mut pending: Vec<(ParsedNode, NodeId, bool)> = nodes
            .into_iter()
            .rev()
            .map(|node| (node, parent, preserve))
            .collect();

        while let Some((node, parent, preserve)) = pending.pop() {
            match node {
                ParsedNode::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    let element = ElementData::new(&tag.to_ascii_lowercase(), None).with_attributes(
                        attributes
                            .iter()
                            .map(|(name, value)| (name.as_str(), value.as_str())),
                    );
                    let preserve_children =
                        preserve || WHITESPACE_PRESERVING.contains(&element.tag_name());
                    let id = self.append_new(parent, NodeKind::Element(element));
                    pending.extend(
                        children
                            .into_iter()
                            .rev()
                            .map(|child| (child, id, preserve_children)),
                    );
                }
                ParsedNode::Text { data } => {
                    if preserve || !data.trim().is_empty() {
                        let _ = self.append_new(parent, NodeKind::Text(CharacterData::new(data)));
                    }
                }
                ParsedNode::Comment { data } => {
                    let _ = self.append_new(parent, NodeKind::Comment(CharacterData::new(data)));
                }
            }
        }
    }

    /// Create `html`, `head` or `body` where the parsed tree lacked them.
    /// A missing `head` goes first under `html`, a missing `body` last.
    pub(crate) fn ensure_structure(&mut self) {
        let html = match self.document_element() {
            Some(html) => html,
            None => {
                tracing::warn!("no document element after parsing, creating one");
                self.append_new(
                    NodeId::ROOT,
                    NodeKind::Element(ElementData::new("html", None)),
                )
            }
        };
        if self.head().is_none() {
            tracing::debug!("creating head element");
            let head = self
                .tree_mut()
                .alloc(NodeKind::Element(ElementData::new("head", None)));
            self.tree_mut().link_at(html, head, 0);
        }
        if self.body().is_none() {
            tracing::debug!("creating body element");
            let _ = self.append_new(html, NodeKind::Element(ElementData::new("body", None)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_drops_insignificant_whitespace() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.convert_nodes(
            vec![
                ParsedNode::text("  \n "),
                ParsedNode::element("PRE", &[("Class", "code")], vec![ParsedNode::text("  ")]),
                ParsedNode::comment(" note "),
                ParsedNode::text(" x "),
            ],
            body,
        );

        let tree = doc.tree();
        let children = tree.children(body);
        assert_eq!(children.len(), 3);
        let pre = tree.as_element(children[0]).unwrap();
        assert_eq!(pre.tag_name(), "pre");
        assert_eq!(pre.get_attribute("class"), Some("code"));
        assert_eq!(tree.text_content(children[0]), "  ");
        assert_eq!(tree.node_value(children[1]), Some(" note "));
        assert_eq!(tree.node_value(children[2]), Some(" x "));
    }

    #[test]
    fn test_ensure_structure_adds_missing_elements() {
        let mut doc = Document::new();
        let _ = doc.load_parsed(Ok(ParsedDocument {
            doctype: Some("html".to_string()),
            root: Some(ParsedNode::element(
                "html",
                &[],
                vec![ParsedNode::element("div", &[], vec![])],
            )),
        }));

        let tree = doc.tree();
        let roots = tree.children(NodeId::ROOT);
        assert_eq!(roots.len(), 2);
        assert_eq!(doc.doctype(), Some(roots[0]));
        let html = doc.document_element().unwrap();
        let names: Vec<_> = tree
            .children(html)
            .iter()
            .map(|&c| tree.as_element(c).unwrap().tag_name().to_string())
            .collect();
        assert_eq!(names, ["head", "div", "body"]);
    }
}
