//! DOM tree and CSS selector engine for the Larch browser core.
//!
//! This crate provides an arena-based DOM tree following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) plus a selector engine
//! that resolves CSS selectors against it.
//!
//! # Design
//!
//! Every node lives in the [`DomTree`] arena owned by a [`Document`] and is
//! addressed by a [`NodeId`]. Parent and sibling links are handles; the child
//! list is the only ownership edge, so detached nodes simply stay in the arena
//! until the document is dropped.
//!
//! HTML tokenization is not done here. An external [`HtmlParser`] hands the
//! document a [`ParsedDocument`] forest, which [`Document::load_parsed`]
//! converts into arena nodes.
//!
//! # Example
//!
//! ```
//! use larch_dom::{Document, NodeId};
//!
//! let mut doc = Document::new();
//! let body = doc.body().unwrap();
//! let list = doc.create_element("ul", None);
//! doc.tree_mut().set_attribute(list, "class", "menu").unwrap();
//! let _ = doc.tree_mut().append_child(body, list).unwrap();
//!
//! assert_eq!(doc.query_selector("body > ul.menu"), Some(list));
//! assert_eq!(doc.query_selector_all(".menu").len(), 1);
//! assert_eq!(doc.tree().parent(list), Some(body));
//! assert_ne!(list, NodeId::ROOT);
//! ```

mod attr;
mod character_data;
mod convert;
mod document;
mod element;
mod error;
mod event;
mod index;
mod node;
mod serialize;
mod source;
mod style;
mod tree;

/// CSS selector parsing, matching and the document query engine.
pub mod selector;

pub use attr::{Attr, XLINK_NAMESPACE, XML_NAMESPACE, XMLNS_NAMESPACE};
pub use character_data::CharacterData;
pub use document::{Document, ReadyState};
pub use element::{ClassList, Dataset, ElementData, VOID_ELEMENTS};
pub use error::{DomError, DomResult, ErrorLog};
pub use event::{Event, EventListener, ListenerResult};
pub use node::{DocumentTypeData, Node, NodeId, NodeKind, NodeType};
pub use source::{HtmlParser, ParseError, ParsedDocument, ParsedNode};
pub use style::{ComputedStyle, INHERITED_PROPERTIES, StyleMap};
pub use tree::{AncestorIterator, DescendantIterator, DomTree, PrecedingSiblingIterator};
