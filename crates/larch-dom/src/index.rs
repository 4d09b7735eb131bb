//! Document-level `id` lookup table.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::node::NodeId;
use crate::tree::DomTree;

/// Maps `id` attribute values to elements attached under the document node.
///
/// The table is rebuilt on the first lookup after the tree's mutation
/// generation moves. When several elements share an id, the first in
/// document order wins.
#[derive(Debug, Default)]
pub(crate) struct IdIndex {
    cache: RefCell<Option<(u64, HashMap<String, NodeId>)>>,
}

impl IdIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lookup(&self, tree: &DomTree, id: &str) -> Option<NodeId> {
        let mut cache = self.cache.borrow_mut();
        let stale = cache
            .as_ref()
            .is_none_or(|(generation, _)| *generation != tree.generation());
        if stale {
            tracing::debug!(generation = tree.generation(), "rebuilding id index");
            *cache = Some((tree.generation(), Self::build(tree)));
        }
        cache.as_ref().and_then(|(_, map)| map.get(id).copied())
    }

    fn build(tree: &DomTree) -> HashMap<String, NodeId> {
        let mut map = HashMap::new();
        for node in tree.element_descendants(NodeId::ROOT) {
            if let Some(id) = tree.as_element(node).and_then(|e| e.id())
                && !id.is_empty()
            {
                let _ = map.entry(id.to_string()).or_insert(node);
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementData;
    use crate::node::NodeKind;

    #[test]
    fn test_lookup_tracks_mutations() {
        let mut tree = DomTree::new();
        let first = tree.alloc(NodeKind::Element(ElementData::new("div", None)));
        let second = tree.alloc(NodeKind::Element(ElementData::new("div", None)));
        let _ = tree.append_child(NodeId::ROOT, first).unwrap();
        let _ = tree.append_child(first, second).unwrap();
        tree.set_attribute(second, "id", "dup").unwrap();

        let index = IdIndex::new();
        assert_eq!(index.lookup(&tree, "dup"), Some(second));

        tree.set_attribute(first, "id", "dup").unwrap();
        assert_eq!(index.lookup(&tree, "dup"), Some(first));

        let _ = tree.remove_child(NodeId::ROOT, first).unwrap();
        assert_eq!(index.lookup(&tree, "dup"), None);
        assert_eq!(index.lookup(&tree, ""), None);
    }
}
