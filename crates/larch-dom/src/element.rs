//! [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
//!
//! Element payload: tag, namespace, the attribute list and the views derived
//! from it. The class list, inline style and dataset are parsed from their
//! attributes on first read and cached until that attribute changes.

use std::cell::OnceCell;

use crate::attr::Attr;
use crate::error::DomResult;
use crate::node::NodeId;
use crate::style::{StyleMap, to_kebab_case};
use crate::tree::DomTree;

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr" (plus the legacy `param`).
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
///
/// NOTE: Only the local name, an optional namespace and the attribute list
/// are stored. Custom element state is not modelled.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag_name: String,
    node_name: String,
    namespace_uri: Option<String>,
    /// "An element has an associated attribute list", kept in insertion order.
    attributes: Vec<Attr>,
    is_void: bool,
    class_list: OnceCell<ClassList>,
    style: OnceCell<StyleMap>,
    dataset: OnceCell<Dataset>,
}

impl ElementData {
    pub(crate) fn new(tag: &str, namespace_uri: Option<&str>) -> Self {
        let tag_name = tag.to_ascii_lowercase();
        let node_name = match namespace_uri {
            None => tag.to_ascii_uppercase(),
            Some(_) => tag.to_string(),
        };
        let is_void = VOID_ELEMENTS.contains(&tag_name.as_str());
        Self {
            tag_name,
            node_name,
            namespace_uri: namespace_uri.map(str::to_string),
            attributes: Vec::new(),
            is_void,
            class_list: OnceCell::new(),
            style: OnceCell::new(),
            dataset: OnceCell::new(),
        }
    }

    /// The lower-cased local name, e.g. `div`.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// The upper-cased tag for HTML elements, or the tag as written when a
    /// namespace was given.
    #[must_use]
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// The namespace given at creation.
    #[must_use]
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// Whether this is a void element (no end tag, no children when
    /// serialized).
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.is_void
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attr] {
        &self.attributes
    }

    /// Whether the element has any attributes.
    #[must_use]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Look up an attribute; the name is matched case-insensitively.
    #[must_use]
    pub fn get_attribute_node(&self, name: &str) -> Option<&Attr> {
        self.attributes
            .iter()
            .find(|attr| attr.name().eq_ignore_ascii_case(name))
    }

    /// The value of an attribute.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get_attribute_node(name).map(Attr::value)
    }

    /// Whether an attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute_node(name).is_some()
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// The raw `class` attribute, empty when absent.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.get_attribute("class").unwrap_or_default()
    }

    /// The class tokens.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    #[must_use]
    pub fn class_list(&self) -> &ClassList {
        self.class_list
            .get_or_init(|| ClassList::parse(self.class_name()))
    }

    /// The declarations of the inline `style` attribute.
    #[must_use]
    pub fn style(&self) -> &StyleMap {
        self.style
            .get_or_init(|| StyleMap::parse(self.get_attribute("style").unwrap_or_default()))
    }

    /// The `data-*` attributes keyed by camelCase name.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        self.dataset
            .get_or_init(|| Dataset::from_attributes(&self.attributes))
    }

    /// Add `(name, value)` pairs in order; a repeated name keeps its first
    /// position and its last value.
    pub(crate) fn with_attributes<'a>(
        mut self,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        for (name, value) in attributes {
            let _ = self.upsert(Attr::new(name, value));
        }
        self
    }

    /// Drop the cached view derived from `name`.
    fn invalidate(&mut self, name: &str) {
        match name {
            "class" => {
                let _ = self.class_list.take();
            }
            "style" => {
                let _ = self.style.take();
            }
            _ if name.starts_with("data-") => {
                let _ = self.dataset.take();
            }
            _ => {}
        }
    }

    /// Insert or replace an attribute, keeping the position of a replaced
    /// one. Returns the attribute that was replaced.
    fn upsert(&mut self, attr: Attr) -> Option<Attr> {
        self.invalidate(attr.name());
        match self
            .attributes
            .iter_mut()
            .find(|existing| existing.name() == attr.name())
        {
            Some(existing) => Some(std::mem::replace(existing, attr)),
            None => {
                self.attributes.push(attr);
                None
            }
        }
    }

    fn remove(&mut self, name: &str) -> Option<Attr> {
        let index = self
            .attributes
            .iter()
            .position(|attr| attr.name().eq_ignore_ascii_case(name))?;
        let removed = self.attributes.remove(index);
        self.invalidate(removed.name());
        Some(removed)
    }

    /// A copy with the same tag and attributes, owned by nobody yet.
    pub(crate) fn clone_detached(&self) -> Self {
        let mut copy = Self::new(&self.node_name, self.namespace_uri.as_deref());
        copy.attributes = self
            .attributes
            .iter()
            .map(|attr| Attr::new(attr.name(), attr.value()))
            .collect();
        copy
    }

    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        for attr in &mut self.attributes {
            attr.set_owner(Some(owner));
        }
    }

    /// Same attribute names and values, in any order.
    pub(crate) fn same_attributes(&self, other: &Self) -> bool {
        self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .all(|attr| other.get_attribute(attr.name()) == Some(attr.value()))
    }
}

/// [§ 7.1 Interface DOMTokenList](https://dom.spec.whatwg.org/#interface-domtokenlist)
///
/// Whitespace-separated class tokens, de-duplicated, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Parse a `class` attribute value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut list = Self::default();
        for token in value.split_ascii_whitespace() {
            let _ = list.add(token);
        }
        list
    }

    /// Whether `token` is present.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// The serialized attribute value.
    #[must_use]
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        before != self.tokens.len()
    }
}

/// [§ 3.2.6.6 Embedding custom non-visible data](https://html.spec.whatwg.org/multipage/dom.html#dom-dataset)
///
/// `data-*` attributes keyed by their camelCase property name, in
/// attribute order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<(String, String)>,
}

impl Dataset {
    fn from_attributes(attributes: &[Attr]) -> Self {
        let entries = attributes
            .iter()
            .filter_map(|attr| {
                let key = attr.name().strip_prefix("data-")?;
                Some((to_camel_case(key), attr.value().to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Value by camelCase key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no `data-*` attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(key, value)` pairs in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// `foo-bar` to `fooBar`. A hyphen not followed by a lowercase ASCII letter
/// is kept.
fn to_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '-' && next.is_ascii_lowercase() => {
                result.push(next.to_ascii_uppercase());
                let _ = chars.next();
            }
            _ => result.push(c),
        }
    }
    result
}

impl DomTree {
    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-setattribute)
    ///
    /// Set an attribute, replacing the value of an existing one in place.
    /// Only the view derived from that attribute is invalidated.
    ///
    /// # Errors
    ///
    /// [`DomError::WrongNodeType`](crate::DomError::WrongNodeType) if `id` is
    /// not an element, [`DomError::UnknownNode`](crate::DomError::UnknownNode)
    /// for foreign handles.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let _ = self.set_attribute_node(id, Attr::new(name, value))?;
        Ok(())
    }

    /// Attach an attribute node, returning the one it replaced.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn set_attribute_node(&mut self, id: NodeId, mut attr: Attr) -> DomResult<Option<Attr>> {
        attr.set_owner(Some(id));
        let mut replaced = self.element_mut(id)?.upsert(attr);
        if let Some(old) = replaced.as_mut() {
            old.set_owner(None);
        }
        self.bump_generation();
        Ok(replaced)
    }

    /// Remove an attribute, returning it detached.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<Attr>> {
        let mut removed = self.element_mut(id)?.remove(name);
        if let Some(attr) = removed.as_mut() {
            attr.set_owner(None);
            self.bump_generation();
        }
        Ok(removed)
    }

    /// Set the `id` attribute.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn set_id(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.set_attribute(id, "id", value)
    }

    /// Set the `class` attribute.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn set_class_name(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.set_attribute(id, "class", value)
    }

    fn edit_class_list(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut ClassList) -> bool,
    ) -> DomResult<bool> {
        let mut list = self.element(id)?.class_list().clone();
        let changed = edit(&mut list);
        if changed {
            self.set_attribute(id, "class", &list.value())?;
        }
        Ok(changed)
    }

    /// Add a class token. Returns whether the class list changed.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn add_class(&mut self, id: NodeId, token: &str) -> DomResult<bool> {
        self.edit_class_list(id, |list| list.add(token))
    }

    /// Remove a class token. Returns whether the class list changed.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn remove_class(&mut self, id: NodeId, token: &str) -> DomResult<bool> {
        self.edit_class_list(id, |list| list.remove(token))
    }

    /// Add the token if absent, remove it if present. Returns whether the
    /// token is present afterwards.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn toggle_class(&mut self, id: NodeId, token: &str) -> DomResult<bool> {
        let present = self.element(id)?.class_list().contains(token);
        if present {
            let _ = self.remove_class(id, token)?;
        } else {
            let _ = self.add_class(id, token)?;
        }
        Ok(!present)
    }

    /// Set one inline style declaration and rewrite the `style` attribute.
    ///
    /// `property` may be camelCase (`backgroundColor`) or kebab-case
    /// (`background-color`). An empty value removes the declaration; removing
    /// the last one removes the attribute.
    ///
    /// # Errors
    ///
    /// As [`DomTree::set_attribute`].
    pub fn set_style_property(
        &mut self,
        id: NodeId,
        property: &str,
        value: &str,
    ) -> DomResult<()> {
        let mut style = self.element(id)?.style().clone();
        let property = to_kebab_case(property);
        if value.trim().is_empty() {
            style.remove(&property);
        } else {
            style.set(&property, value);
        }

        if style.is_empty() {
            let _ = self.remove_attribute(id, "style")?;
            Ok(())
        } else {
            self.set_attribute(id, "style", &style.to_css_text())
        }
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#concept-getelementsbytagname)
    ///
    /// Descendant elements of `scope` with the given tag, in document order.
    /// `"*"` matches every element; the comparison ignores ASCII case.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        self.element_descendants(scope)
            .filter(|&node| {
                name == "*"
                    || self
                        .as_element(node)
                        .is_some_and(|e| e.tag_name().eq_ignore_ascii_case(name))
            })
            .collect()
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#concept-getelementsbyclassname)
    ///
    /// Descendant elements of `scope` carrying every class in the
    /// whitespace-separated `names`, in document order. An empty `names`
    /// matches nothing.
    #[must_use]
    pub fn get_elements_by_class_name(&self, scope: NodeId, names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = names.split_ascii_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.element_descendants(scope)
            .filter(|&node| {
                self.as_element(node).is_some_and(|e| {
                    let classes = e.class_list();
                    wanted.iter().all(|class| classes.contains(class))
                })
            })
            .collect()
    }
}
