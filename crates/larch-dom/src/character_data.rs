//! [§ 4.10 Interface CharacterData](https://dom.spec.whatwg.org/#interface-characterdata)
//!
//! Text and comment payloads. Offsets and counts are measured in Unicode
//! scalar values, so splicing never cuts a UTF-8 sequence.

use crate::error::{DomError, DomResult};
use crate::node::{NodeId, NodeKind, NodeType};
use crate::tree::DomTree;

/// The string payload of a Text or Comment node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterData {
    data: String,
    length: usize,
}

impl CharacterData {
    /// Wrap a string.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        let data = data.into();
        let length = data.chars().count();
        Self { data, length }
    }

    /// The data.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Length in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Whether the data is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Replace the data wholesale.
    pub fn set_data(&mut self, data: impl Into<String>) {
        *self = Self::new(data);
    }

    const fn check_offset(&self, offset: usize) -> DomResult<()> {
        if offset > self.length {
            return Err(DomError::Range {
                offset,
                length: self.length,
            });
        }
        Ok(())
    }

    /// Byte index of the character at `offset` (or the end of the string).
    fn byte_index(&self, offset: usize) -> usize {
        self.data
            .char_indices()
            .nth(offset)
            .map_or(self.data.len(), |(index, _)| index)
    }

    /// Byte range covering `count` characters from `offset`, clamped to the
    /// end of the data.
    fn byte_range(&self, offset: usize, count: usize) -> DomResult<(usize, usize)> {
        self.check_offset(offset)?;
        let end = offset.saturating_add(count).min(self.length);
        Ok((self.byte_index(offset), self.byte_index(end)))
    }

    /// [§ 4.10](https://dom.spec.whatwg.org/#dom-characterdata-substringdata)
    ///
    /// # Errors
    ///
    /// [`DomError::Range`] if `offset` is past the end.
    pub fn substring_data(&self, offset: usize, count: usize) -> DomResult<String> {
        let (start, end) = self.byte_range(offset, count)?;
        Ok(self.data[start..end].to_string())
    }

    /// [§ 4.10](https://dom.spec.whatwg.org/#dom-characterdata-appenddata)
    pub fn append_data(&mut self, data: &str) {
        self.data.push_str(data);
        self.length += data.chars().count();
    }

    /// [§ 4.10](https://dom.spec.whatwg.org/#dom-characterdata-insertdata)
    ///
    /// # Errors
    ///
    /// [`DomError::Range`] if `offset` is past the end.
    pub fn insert_data(&mut self, offset: usize, data: &str) -> DomResult<()> {
        self.replace_data(offset, 0, data)
    }

    /// [§ 4.10](https://dom.spec.whatwg.org/#dom-characterdata-deletedata)
    ///
    /// # Errors
    ///
    /// [`DomError::Range`] if `offset` is past the end.
    pub fn delete_data(&mut self, offset: usize, count: usize) -> DomResult<()> {
        self.replace_data(offset, count, "")
    }

    /// [§ 4.10](https://dom.spec.whatwg.org/#dom-characterdata-replacedata)
    ///
    /// Replaces up to `count` characters starting at `offset` with `data` in
    /// a single splice.
    ///
    /// # Errors
    ///
    /// [`DomError::Range`] if `offset` is past the end.
    pub fn replace_data(&mut self, offset: usize, count: usize, data: &str) -> DomResult<()> {
        let (start, end) = self.byte_range(offset, count)?;
        self.data.replace_range(start..end, data);
        self.length = self.data.chars().count();
        Ok(())
    }

    /// Truncate to `offset` characters and return the removed suffix.
    fn split_off(&mut self, offset: usize) -> DomResult<String> {
        self.check_offset(offset)?;
        let suffix = self.data.split_off(self.byte_index(offset));
        self.length = offset;
        Ok(suffix)
    }
}

impl DomTree {
    /// Character data of a text or comment node.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn character_data(&self, id: NodeId) -> DomResult<&CharacterData> {
        let node = self.node(id)?;
        node.character_data().ok_or(DomError::WrongNodeType {
            node: id,
            expected: "text or comment node",
            actual: node.node_type(),
        })
    }

    fn character_data_mut(&mut self, id: NodeId) -> DomResult<&mut CharacterData> {
        let node = self.get_mut(id).ok_or(DomError::UnknownNode(id))?;
        let actual = node.kind.node_type();
        match &mut node.kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => Ok(data),
            _ => Err(DomError::WrongNodeType {
                node: id,
                expected: "text or comment node",
                actual,
            }),
        }
    }

    /// Apply `edit` to a node's character data and record the mutation.
    fn edit_character_data<T>(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut CharacterData) -> DomResult<T>,
    ) -> DomResult<T> {
        let result = edit(self.character_data_mut(id)?)?;
        self.bump_generation();
        Ok(result)
    }

    /// The data of a text or comment node.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn data(&self, id: NodeId) -> DomResult<&str> {
        self.character_data(id).map(CharacterData::data)
    }

    /// Replace the data of a text or comment node.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn set_data(&mut self, id: NodeId, data: &str) -> DomResult<()> {
        self.edit_character_data(id, |cd| {
            cd.set_data(data);
            Ok(())
        })
    }

    /// Length in characters of a text or comment node.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn length(&self, id: NodeId) -> DomResult<usize> {
        self.character_data(id).map(CharacterData::len)
    }

    /// See [`CharacterData::substring_data`].
    ///
    /// # Errors
    ///
    /// [`DomError::Range`], [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn substring_data(&self, id: NodeId, offset: usize, count: usize) -> DomResult<String> {
        self.character_data(id)?.substring_data(offset, count)
    }

    /// See [`CharacterData::append_data`].
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn append_data(&mut self, id: NodeId, data: &str) -> DomResult<()> {
        self.edit_character_data(id, |cd| {
            cd.append_data(data);
            Ok(())
        })
    }

    /// See [`CharacterData::insert_data`].
    ///
    /// # Errors
    ///
    /// [`DomError::Range`], [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn insert_data(&mut self, id: NodeId, offset: usize, data: &str) -> DomResult<()> {
        self.edit_character_data(id, |cd| cd.insert_data(offset, data))
    }

    /// See [`CharacterData::delete_data`].
    ///
    /// # Errors
    ///
    /// [`DomError::Range`], [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn delete_data(&mut self, id: NodeId, offset: usize, count: usize) -> DomResult<()> {
        self.edit_character_data(id, |cd| cd.delete_data(offset, count))
    }

    /// See [`CharacterData::replace_data`].
    ///
    /// # Errors
    ///
    /// [`DomError::Range`], [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn replace_data(
        &mut self,
        id: NodeId,
        offset: usize,
        count: usize,
        data: &str,
    ) -> DomResult<()> {
        self.edit_character_data(id, |cd| cd.replace_data(offset, count, data))
    }

    /// [§ 4.11](https://dom.spec.whatwg.org/#dom-text-splittext)
    ///
    /// Split a text node at `offset`. The node keeps the prefix; a new text
    /// node holding the suffix is returned and, if the node has a parent,
    /// inserted as its next sibling.
    ///
    /// # Errors
    ///
    /// [`DomError::Range`] if `offset` is past the end, [`DomError::WrongNodeType`]
    /// for anything but a text node.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> DomResult<NodeId> {
        let node_type = self.node(id)?.node_type();
        if node_type != NodeType::Text {
            return Err(DomError::WrongNodeType {
                node: id,
                expected: "text node",
                actual: node_type,
            });
        }

        let suffix = self.edit_character_data(id, |cd| cd.split_off(offset))?;
        let new_node = self.alloc(NodeKind::Text(CharacterData::new(suffix)));
        if let Some(parent) = self.parent(id) {
            let index = self.index_in_parent(id).map_or(0, |index| index + 1);
            self.link_at(parent, new_node, index);
        }
        Ok(new_node)
    }

    /// [§ 4.11](https://dom.spec.whatwg.org/#dom-text-wholetext)
    ///
    /// The data of the node and its contiguous text siblings, in order.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] or [`DomError::WrongNodeType`].
    pub fn whole_text(&self, id: NodeId) -> DomResult<String> {
        let _ = self.character_data(id)?;
        let is_text = |node: &NodeId| self.get(*node).is_some_and(|n| n.is_text());

        let mut first = id;
        while let Some(prev) = self.prev_sibling(first).filter(is_text) {
            first = prev;
        }

        let mut whole = String::new();
        let mut current = Some(first);
        while let Some(node) = current.filter(is_text) {
            whole.push_str(self.data(node)?);
            current = self.next_sibling(node);
        }
        if whole.is_empty() {
            // A comment has no text run of its own.
            whole.push_str(self.data(id)?);
        }
        Ok(whole)
    }
}
