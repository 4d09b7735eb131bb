//! [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)

use crate::node::NodeId;

/// Namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// Namespace bound to the `xlink` prefix.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
/// Namespace of `xmlns` and `xmlns:*` declarations.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// A single attribute.
///
/// "Attr nodes are simply known as attributes." Names are ASCII-lowercased
/// on construction; a `prefix:local` name is split and well-known prefixes
/// resolve to their namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    name: String,
    value: String,
    prefix: Option<String>,
    local_name: String,
    namespace_uri: Option<&'static str>,
    owner_element: Option<NodeId>,
}

impl Attr {
    /// Create a detached attribute.
    #[must_use]
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let (prefix, local_name) = match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
            None => (None, name.clone()),
        };
        let namespace_uri = match prefix.as_deref() {
            Some("xml") => Some(XML_NAMESPACE),
            Some("xlink") => Some(XLINK_NAMESPACE),
            Some("xmlns") => Some(XMLNS_NAMESPACE),
            None if name == "xmlns" => Some(XMLNS_NAMESPACE),
            _ => None,
        };

        Self {
            name,
            value: value.into(),
            prefix,
            local_name,
            namespace_uri,
            owner_element: None,
        }
    }

    /// The qualified, lower-cased name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value of a detached attribute. Attributes owned by an
    /// element are changed through [`DomTree::set_attribute`](crate::DomTree::set_attribute).
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// The part before `:`, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The part after `:`, or the whole name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The namespace resolved from the prefix.
    #[must_use]
    pub const fn namespace_uri(&self) -> Option<&'static str> {
        self.namespace_uri
    }

    /// The element this attribute belongs to.
    #[must_use]
    pub const fn owner_element(&self) -> Option<NodeId> {
        self.owner_element
    }

    /// Always true.
    #[must_use]
    pub const fn specified(&self) -> bool {
        true
    }

    pub(crate) fn set_owner(&mut self, owner: Option<NodeId>) {
        self.owner_element = owner;
    }
}
