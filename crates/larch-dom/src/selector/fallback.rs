//! Single-criterion matching used when the full matcher fails.
//!
//! This is an approximation: it looks at one `#id`, `.class` or leading tag
//! token of the selector and ignores everything else.

use crate::node::NodeId;
use crate::tree::DomTree;

/// The one condition extracted from a selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Criterion<'a> {
    Id(&'a str),
    Class(&'a str),
    Tag(&'a str),
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// The name run following the first `marker` in `selector`, if non-empty.
fn name_after(selector: &str, marker: char) -> Option<&str> {
    selector.match_indices(marker).find_map(|(index, _)| {
        let rest = &selector[index + marker.len_utf8()..];
        let end = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
        (end > 0).then_some(&rest[..end])
    })
}

impl<'a> Criterion<'a> {
    /// First `#id`, else first `.class`, else the name the selector starts with.
    pub(super) fn extract(selector: &'a str) -> Option<Self> {
        if let Some(id) = name_after(selector, '#') {
            return Some(Self::Id(id));
        }
        if let Some(class) = name_after(selector, '.') {
            return Some(Self::Class(class));
        }
        let end = selector
            .find(|c: char| !is_name_char(c))
            .unwrap_or(selector.len());
        (end > 0).then_some(Self::Tag(&selector[..end]))
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        match self {
            Self::Id(id) => element.id() == Some(*id),
            Self::Class(class) => element.class_list().contains(class),
            Self::Tag(tag) => element.tag_name().eq_ignore_ascii_case(tag),
        }
    }
}

/// Element descendants of `scope` satisfying the extracted criterion, or
/// every element descendant when nothing could be extracted.
pub(super) fn select(tree: &DomTree, scope: NodeId, selector: &str) -> Vec<NodeId> {
    let elements = tree.element_descendants(scope);
    match Criterion::extract(selector) {
        Some(criterion) => elements
            .filter(|&id| criterion.matches(tree, id))
            .collect(),
        None => elements.collect(),
    }
}

/// Whether `node` satisfies the extracted criterion; `false` when nothing
/// could be extracted.
pub(super) fn matches(tree: &DomTree, node: NodeId, selector: &str) -> bool {
    Criterion::extract(selector).is_some_and(|criterion| criterion.matches(tree, node))
}
