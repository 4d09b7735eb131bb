//! Node identity, node types and the per-node payload.

use strum_macros::{Display, FromRepr};

use crate::character_data::CharacterData;
use crate::element::ElementData;
use crate::event::ListenerRegistry;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the arena without borrowing
/// issues. Handles are never reused, so a detached node keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// The DOM Level-1 `nodeType` codes. Only some of them have a [`NodeKind`]
/// in this tree, but every code round-trips through [`NodeType::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u16)]
pub enum NodeType {
    /// `ELEMENT_NODE`
    #[strum(to_string = "ELEMENT_NODE")]
    Element = 1,
    /// `ATTRIBUTE_NODE`
    #[strum(to_string = "ATTRIBUTE_NODE")]
    Attribute = 2,
    /// `TEXT_NODE`
    #[strum(to_string = "TEXT_NODE")]
    Text = 3,
    /// `CDATA_SECTION_NODE`
    #[strum(to_string = "CDATA_SECTION_NODE")]
    CdataSection = 4,
    /// `ENTITY_REFERENCE_NODE`
    #[strum(to_string = "ENTITY_REFERENCE_NODE")]
    EntityReference = 5,
    /// `ENTITY_NODE`
    #[strum(to_string = "ENTITY_NODE")]
    Entity = 6,
    /// `PROCESSING_INSTRUCTION_NODE`
    #[strum(to_string = "PROCESSING_INSTRUCTION_NODE")]
    ProcessingInstruction = 7,
    /// `COMMENT_NODE`
    #[strum(to_string = "COMMENT_NODE")]
    Comment = 8,
    /// `DOCUMENT_NODE`
    #[strum(to_string = "DOCUMENT_NODE")]
    Document = 9,
    /// `DOCUMENT_TYPE_NODE`
    #[strum(to_string = "DOCUMENT_TYPE_NODE")]
    DocumentType = 10,
    /// `DOCUMENT_FRAGMENT_NODE`
    #[strum(to_string = "DOCUMENT_FRAGMENT_NODE")]
    DocumentFragment = 11,
    /// `NOTATION_NODE`
    #[strum(to_string = "NOTATION_NODE")]
    Notation = 12,
}

impl NodeType {
    /// The numeric `nodeType` code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look up a type by its numeric code.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Self::from_repr(code)
    }
}

/// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
///
/// "Doctypes have an associated name, public ID, and system ID."
/// Only the name is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTypeData {
    /// The doctype name, e.g. `html`.
    pub name: String,
}

/// The type-specific payload of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType(DocumentTypeData),
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    DocumentFragment,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(CharacterData),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(CharacterData),
}

impl NodeKind {
    /// The DOM type code for this payload.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Document => NodeType::Document,
            Self::DocumentType(_) => NodeType::DocumentType,
            Self::DocumentFragment => NodeType::DocumentFragment,
            Self::Element(_) => NodeType::Element,
            Self::Text(_) => NodeType::Text,
            Self::Comment(_) => NodeType::Comment,
        }
    }

    /// Whether nodes of this kind may have children.
    pub(crate) const fn accepts_children(&self) -> bool {
        matches!(
            self,
            Self::Document | Self::DocumentFragment | Self::Element(_)
        )
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// Links are stored as handles and only the tree updates them, which keeps
/// the parent, child list and sibling chain consistent.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) listeners: ListenerRegistry,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
            listeners: ListenerRegistry::default(),
        }
    }

    /// The node's payload.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The DOM type code.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// The parent handle, `None` when detached (or for the document).
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The previous sibling handle.
    #[must_use]
    pub const fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    /// The next sibling handle.
    #[must_use]
    pub const fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-nodename)
    ///
    /// `#text`, `#comment`, `#document`, `#document-fragment`, the doctype
    /// name, or the element's qualified name.
    #[must_use]
    pub fn node_name(&self) -> &str {
        match &self.kind {
            NodeKind::Document => "#document",
            NodeKind::DocumentType(doctype) => &doctype.name,
            NodeKind::DocumentFragment => "#document-fragment",
            NodeKind::Element(element) => element.node_name(),
            NodeKind::Text(_) => "#text",
            NodeKind::Comment(_) => "#comment",
        }
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-nodevalue)
    ///
    /// The data of text and comment nodes, `None` for everything else.
    #[must_use]
    pub fn node_value(&self) -> Option<&str> {
        self.character_data().map(CharacterData::data)
    }

    /// Element data if this node is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Character data if this is a text or comment node.
    #[must_use]
    pub const fn character_data(&self) -> Option<&CharacterData> {
        match &self.kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => Some(data),
            _ => None,
        }
    }

    /// Whether this is an element.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Whether this is a text node.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }
}
