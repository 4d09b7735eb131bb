//! Arena-based DOM tree with O(1) node access and traversal.
//!
//! [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
//!
//! "The DOM represents a document as a tree. A tree is a finite hierarchical
//! tree structure."
//!
//! All nodes are stored in a contiguous vector and every relationship is a
//! [`NodeId`] index. Structural mutations go through [`DomTree`] methods,
//! which keep the child list and the sibling chain in agreement and bump the
//! mutation generation that cached indexes validate against.

use std::iter;

use crate::character_data::CharacterData;
use crate::element::ElementData;
use crate::error::{DomError, DomResult};
use crate::node::{Node, NodeId, NodeKind, NodeType};

/// The node arena of one document.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes, indexed by `NodeId`. The document node is always at
    /// index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
    /// Incremented on every structural, attribute or data mutation.
    generation: u64,
}

impl DomTree {
    /// Create a tree holding just the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            generation: 0,
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get a node, failing with [`DomError::UnknownNode`] for foreign handles.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `id` is not part of this tree.
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::UnknownNode(id))
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is allocated at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The mutation generation. Any change to structure, attributes or
    /// character data produces a new value.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Allocate a detached node and return its ID. An element's attributes
    /// are owned by the new node.
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(kind);
        if let NodeKind::Element(element) = &mut node.kind {
            element.set_owner(id);
        }
        self.nodes.push(node);
        id
    }

    // ----- Navigation -----

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Whether the node has any children.
    #[must_use]
    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-parentnode-children)
    ///
    /// The element children of a node.
    #[must_use]
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect()
    }

    /// Number of element children.
    #[must_use]
    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.children(id)
            .iter()
            .filter(|&&child| self.is_element(child))
            .count()
    }

    /// The first element child.
    #[must_use]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.is_element(child))
    }

    /// The last element child.
    #[must_use]
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .find(|&child| self.is_element(child))
    }

    /// The closest preceding sibling that is an element.
    #[must_use]
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.preceding_siblings(id)
            .find(|&sibling| self.is_element(sibling))
    }

    /// The closest following sibling that is an element.
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.next_sibling(sibling);
        }
        None
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-contains)
    ///
    /// True if `other` is `node` or one of its descendants.
    #[must_use]
    pub fn contains(&self, node: NodeId, other: NodeId) -> bool {
        node == other || self.is_descendant_of(other, node)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Iterate over the descendants of a node in pre-order (document order),
    /// excluding the node itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Element descendants of a node in document order.
    pub fn element_descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(|&node| self.is_element(node))
    }

    // ----- Typed access -----

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub(crate) fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get the data of a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(data) => Some(data.data()),
            _ => None,
        })
    }

    /// Element data, failing for anything that is not an element.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        let node = self.node(id)?;
        node.as_element().ok_or(DomError::WrongNodeType {
            node: id,
            expected: "element",
            actual: node.node_type(),
        })
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        let actual = self.node(id)?.node_type();
        self.as_element_mut(id).ok_or(DomError::WrongNodeType {
            node: id,
            expected: "element",
            actual,
        })
    }

    /// The DOM type code of a node.
    #[must_use]
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    /// See [`Node::node_name`].
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(Node::node_name)
    }

    /// See [`Node::node_value`].
    #[must_use]
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::node_value)
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(NodeId::ROOT)
    }

    fn child_element_named(&self, parent: NodeId, names: &[&str]) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|&id| {
            self.as_element(id)
                .is_some_and(|e| names.contains(&e.tag_name()))
        })
    }

    /// [§ 3.1.4 The head element](https://html.spec.whatwg.org/multipage/dom.html#the-head-element-2)
    ///
    /// "The head element of a document is the first head element that is a
    /// child of the html element, if there is one, or null otherwise."
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.child_element_named(self.document_element()?, &["head"])
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.child_element_named(self.document_element()?, &["body", "frameset"])
    }

    // ----- Mutation -----

    /// Position of `id` in its parent's child list.
    pub(crate) fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Splice a detached node into `parent` at `index`.
    pub(crate) fn link_at(&mut self, parent: NodeId, child: NodeId, index: usize) {
        let siblings = &self.nodes[parent.0].children;
        let index = index.min(siblings.len());
        let prev = index.checked_sub(1).map(|i| siblings[i]);
        let next = siblings.get(index).copied();

        self.nodes[parent.0].children.insert(index, child);
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = next;
        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = Some(child);
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = Some(child);
        }
        self.bump_generation();
    }

    /// Detach a node from its parent, if it has one.
    pub(crate) fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        let Some(index) = self.index_in_parent(child) else {
            return;
        };
        let _ = self.nodes[parent.0].children.remove(index);

        let node = &mut self.nodes[child.0];
        let prev = node.prev_sibling.take();
        let next = node.next_sibling.take();
        node.parent = None;
        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = prev;
        }
        self.bump_generation();
    }

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// Reject insertions that would break the tree shape.
    fn ensure_pre_insertion_validity(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        let hierarchy = DomError::HierarchyRequest { parent, child };

        if !parent_node.kind.accepts_children() || matches!(child_node.kind, NodeKind::Document) {
            return Err(hierarchy);
        }
        // "If node is a host-including inclusive ancestor of parent, then
        // throw a HierarchyRequestError"
        if self.contains(child, parent) {
            return Err(hierarchy);
        }
        Ok(())
    }

    /// Move `child` (or a fragment's children) to `parent` at the position
    /// of `reference`, or at the end.
    fn insert_validated(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let moved = if matches!(self.nodes[child.0].kind, NodeKind::DocumentFragment) {
            self.nodes[child.0].children.clone()
        } else {
            vec![child]
        };

        for node in moved {
            self.unlink(node);
            let index = reference
                .and_then(|reference| self.index_in_parent(reference))
                .unwrap_or_else(|| self.children(parent).len());
            self.link_at(parent, node, index);
        }
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-appendchild)
    ///
    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Appending a document fragment moves its
    /// children instead. Returns `child`.
    ///
    /// # Errors
    ///
    /// [`DomError::HierarchyRequest`] if the insertion would create a cycle
    /// or `parent` cannot have children; [`DomError::UnknownNode`] for
    /// foreign handles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.ensure_pre_insertion_validity(parent, child)?;
        self.insert_validated(parent, child, None);
        Ok(child)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-insertbefore)
    ///
    /// Insert `new_child` before `reference`, or append it when `reference`
    /// is `None`. Inserting a node before itself is a no-op.
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidReference`] if `reference` is not a child of
    /// `parent`, plus the errors of [`DomTree::append_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let Some(reference) = reference else {
            return self.append_child(parent, new_child);
        };
        self.ensure_pre_insertion_validity(parent, new_child)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::InvalidReference { parent, reference });
        }
        if new_child != reference {
            self.insert_validated(parent, new_child, Some(reference));
        }
        Ok(new_child)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-removechild)
    ///
    /// Detach `child` from `parent`. The subtree below `child` stays intact.
    /// Returns `child`.
    ///
    /// # Errors
    ///
    /// [`DomError::NotFound`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let _ = self.node(parent)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotFound { parent, child });
        }
        self.unlink(child);
        Ok(child)
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-replacechild)
    ///
    /// Put `new_child` where `old_child` was and detach `old_child`.
    /// Returns `old_child`. Replacing a node with itself is a no-op.
    ///
    /// # Errors
    ///
    /// [`DomError::NotFound`] if `old_child` is not a child of `parent`,
    /// plus the errors of [`DomTree::append_child`].
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        let _ = self.node(parent)?;
        if self.parent(old_child) != Some(parent) {
            return Err(DomError::NotFound {
                parent,
                child: old_child,
            });
        }
        self.ensure_pre_insertion_validity(parent, new_child)?;
        if new_child == old_child {
            return Ok(old_child);
        }

        let mut reference = self.next_sibling(old_child);
        if reference == Some(new_child) {
            reference = self.next_sibling(new_child);
        }
        self.unlink(old_child);
        self.insert_validated(parent, new_child, reference);
        Ok(old_child)
    }

    /// Detach every child of `parent`.
    pub(crate) fn remove_all_children(&mut self, parent: NodeId) {
        while let Some(child) = self.last_child(parent) {
            self.unlink(child);
        }
    }

    /// Drop every node except a fresh document node. Handles taken before
    /// the call no longer refer to anything. The generation keeps counting
    /// up so caches built on the old tree are never mistaken for current.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes.shrink_to_fit();
        if let Some(root) = self.nodes.first_mut() {
            *root = Node::new(NodeKind::Document);
        }
        self.bump_generation();
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-clonenode)
    ///
    /// Copy a node (and with `deep`, its whole subtree) into a new detached
    /// node. Clones carry no event listeners.
    ///
    /// # Errors
    ///
    /// [`DomError::WrongNodeType`] for the document node, which cannot be
    /// cloned into its own arena; [`DomError::UnknownNode`] for foreign
    /// handles.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let kind = self.cloned_kind(id)?;
        let copy = self.alloc(kind);
        if !deep {
            return Ok(copy);
        }

        let mut pending: Vec<(NodeId, NodeId)> =
            self.children(id).iter().rev().map(|&child| (child, copy)).collect();
        while let Some((source, parent)) = pending.pop() {
            let kind = self.cloned_kind(source)?;
            let child_copy = self.alloc(kind);
            let index = self.children(parent).len();
            self.link_at(parent, child_copy, index);
            pending.extend(
                self.children(source)
                    .iter()
                    .rev()
                    .map(|&child| (child, child_copy)),
            );
        }
        Ok(copy)
    }

    fn cloned_kind(&self, id: NodeId) -> DomResult<NodeKind> {
        Ok(match &self.node(id)?.kind {
            NodeKind::Document => {
                return Err(DomError::WrongNodeType {
                    node: id,
                    expected: "non-document node",
                    actual: NodeType::Document,
                });
            }
            NodeKind::Element(element) => NodeKind::Element(element.clone_detached()),
            other => other.clone(),
        })
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-normalize)
    ///
    /// Remove empty text nodes and merge adjacent text nodes, throughout the
    /// subtree. Children are processed from the last one backward.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `id` is not part of this tree.
    pub fn normalize(&mut self, id: NodeId) -> DomResult<()> {
        let _ = self.node(id)?;
        let containers: Vec<NodeId> = iter::once(id)
            .chain(self.descendants(id).filter(|&node| {
                matches!(
                    self.nodes[node.0].kind,
                    NodeKind::Element(_) | NodeKind::DocumentFragment
                )
            }))
            .collect();
        for container in containers {
            self.merge_text_children(container);
        }
        Ok(())
    }

    /// Drop the empty text children of `parent` and fold each run of
    /// adjacent text children into its first node.
    fn merge_text_children(&mut self, parent: NodeId) {
        let mut index = self.children(parent).len();
        while index > 0 {
            index -= 1;
            let child = self.children(parent)[index];
            let NodeKind::Text(data) = &self.nodes[child.0].kind else {
                continue;
            };
            if data.is_empty() {
                self.unlink(child);
                continue;
            }
            let Some(prev) = index.checked_sub(1).map(|i| self.children(parent)[i]) else {
                continue;
            };
            if !self.nodes[prev.0].is_text() {
                continue;
            }
            let tail = data.data().to_string();
            if let NodeKind::Text(prev_data) = &mut self.nodes[prev.0].kind {
                prev_data.append_data(&tail);
            }
            self.unlink(child);
        }
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-isequalnode)
    ///
    /// Structural equality: same type, name and value, the same attributes
    /// (in any order) and pairwise equal children. Identity and position are
    /// ignored.
    #[must_use]
    pub fn is_equal_node(&self, a: NodeId, b: NodeId) -> bool {
        let mut pending = vec![(a, b)];
        while let Some((a, b)) = pending.pop() {
            let (Some(left), Some(right)) = (self.get(a), self.get(b)) else {
                return false;
            };
            if left.node_type() != right.node_type()
                || left.node_name() != right.node_name()
                || left.node_value() != right.node_value()
                || left.children.len() != right.children.len()
            {
                return false;
            }
            if let (Some(left), Some(right)) = (left.as_element(), right.as_element())
                && !left.same_attributes(right)
            {
                return false;
            }
            pending.extend(left.children.iter().copied().zip(right.children.iter().copied()));
        }
        true
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// The concatenated data of all descendant text nodes for elements,
    /// fragments and the document; the node's own data for text and
    /// comments.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(value) = self.node_value(id) {
            return value.to_string();
        }
        self.descendants(id)
            .filter_map(|node| self.as_text(node))
            .collect()
    }

    /// Replace the children of an element or fragment with a single text
    /// node holding `text` (no node at all for an empty string). On text and
    /// comment nodes this sets the data; on the document and doctypes it
    /// does nothing.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `id` is not part of this tree.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        match self.node(id)?.kind {
            NodeKind::Text(_) | NodeKind::Comment(_) => self.set_data(id, text),
            NodeKind::Element(_) | NodeKind::DocumentFragment => {
                self.remove_all_children(id);
                if !text.is_empty() {
                    let text_node = self.alloc(NodeKind::Text(CharacterData::new(text)));
                    self.link_at(id, text_node, 0);
                }
                Ok(())
            }
            NodeKind::Document | NodeKind::DocumentType(_) => Ok(()),
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
