//! The query engine behind `query_selector`, `matches` and friends.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{SelectorList, SelectorParseError, fallback, parse_selector_list};
use crate::error::ErrorLog;
use crate::index::IdIndex;
use crate::node::NodeId;
use crate::tree::DomTree;

type CachedParse = Rc<Result<SelectorList, SelectorParseError>>;

/// What a query runs against: the tree, the log recovered failures go to,
/// and optionally the document's id index.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    tree: &'a DomTree,
    errors: &'a ErrorLog,
    id_index: Option<&'a IdIndex>,
}

impl<'a> QueryContext<'a> {
    /// A context without an id index; `#id` lookups scan the tree.
    #[must_use]
    pub const fn new(tree: &'a DomTree, errors: &'a ErrorLog) -> Self {
        Self {
            tree,
            errors,
            id_index: None,
        }
    }

    pub(crate) const fn with_id_index(mut self, index: &'a IdIndex) -> Self {
        self.id_index = Some(index);
        self
    }
}

/// Selectors the engine answers without parsing: exactly `#id`, `.class`
/// or `tag` after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FastPath<'s> {
    Id(&'s str),
    Class(&'s str),
    Tag(&'s str),
}

impl<'s> FastPath<'s> {
    fn classify(selector: &'s str) -> Option<Self> {
        let is_name = |name: &str| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        };
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            is_name(id).then_some(Self::Id(id))
        } else if let Some(class) = selector.strip_prefix('.') {
            is_name(class).then_some(Self::Class(class))
        } else {
            is_name(selector).then_some(Self::Tag(selector))
        }
    }

    fn select(self, cx: &QueryContext<'_>, scope: NodeId) -> Vec<NodeId> {
        match self {
            Self::Id(id) => {
                let found = match cx.id_index {
                    Some(index) if scope == NodeId::ROOT => index.lookup(cx.tree, id),
                    _ => cx
                        .tree
                        .element_descendants(scope)
                        .find(|&node| cx.tree.as_element(node).and_then(|e| e.id()) == Some(id)),
                };
                found.into_iter().collect()
            }
            Self::Class(class) => cx.tree.get_elements_by_class_name(scope, class),
            Self::Tag(tag) => cx.tree.get_elements_by_tag_name(scope, tag),
        }
    }

    fn matches(self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        match self {
            Self::Id(id) => element.id() == Some(id),
            Self::Class(class) => element.class_list().contains(class),
            Self::Tag(tag) => element.tag_name().eq_ignore_ascii_case(tag),
        }
    }
}

/// Resolves selector strings against a tree.
///
/// One engine belongs to one document. Parse results, failures included,
/// are cached by selector string for the engine's lifetime; a selector that
/// fails to parse is logged the first time it is seen and matches nothing.
#[derive(Debug, Default)]
pub struct SelectorEngine {
    cache: RefCell<HashMap<String, CachedParse>>,
}

impl SelectorEngine {
    /// An engine with an empty parse cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The element descendants of `scope` matching `selector`, in document
    /// order.
    #[must_use]
    pub fn select(&self, cx: &QueryContext<'_>, scope: NodeId, selector: &str) -> Vec<NodeId> {
        if let Some(fast) = FastPath::classify(selector) {
            return fast.select(cx, scope);
        }

        let parsed = self.parse(selector, cx.errors);
        let Ok(list) = parsed.as_ref() else {
            return Vec::new();
        };
        list.select(cx.tree, scope).unwrap_or_else(|e| {
            cx.errors.push(format!("Error selecting with '{selector}': {e}"));
            fallback::select(cx.tree, scope, selector)
        })
    }

    /// Whether `node` matches `selector`.
    #[must_use]
    pub fn matches(&self, cx: &QueryContext<'_>, node: NodeId, selector: &str) -> bool {
        if let Some(fast) = FastPath::classify(selector) {
            return fast.matches(cx.tree, node);
        }

        let parsed = self.parse(selector, cx.errors);
        let Ok(list) = parsed.as_ref() else {
            return false;
        };
        list.matches(cx.tree, node).unwrap_or_else(|e| {
            cx.errors.push(format!("Error matching with '{selector}': {e}"));
            fallback::matches(cx.tree, node, selector)
        })
    }

    /// Parse `selector`, going through the cache. A failure is pushed to
    /// `errors` only when it first enters the cache.
    #[must_use]
    pub fn parse(
        &self,
        selector: &str,
        errors: &ErrorLog,
    ) -> Rc<Result<SelectorList, SelectorParseError>> {
        if let Some(cached) = self.cache.borrow().get(selector) {
            return Rc::clone(cached);
        }

        tracing::debug!(selector, "parsing selector");
        let parsed = Rc::new(parse_selector_list(selector));
        if let Err(e) = parsed.as_ref() {
            errors.push(format!("Invalid selector '{selector}': {e}"));
        }
        let _ = self
            .cache
            .borrow_mut()
            .insert(selector.to_string(), Rc::clone(&parsed));
        parsed
    }

    /// Number of distinct selector strings parsed so far.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementData;
    use crate::node::NodeKind;

    fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
        let id = tree.alloc(NodeKind::Element(ElementData::new(tag, None)));
        let _ = tree.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_classify() {
        assert_eq!(FastPath::classify(" #main "), Some(FastPath::Id("main")));
        assert_eq!(FastPath::classify(".nav-item"), Some(FastPath::Class("nav-item")));
        assert_eq!(FastPath::classify("h1"), Some(FastPath::Tag("h1")));
        assert_eq!(FastPath::classify("#"), None);
        assert_eq!(FastPath::classify("div p"), None);
        assert_eq!(FastPath::classify("div.a"), None);
        assert_eq!(FastPath::classify("*"), None);
    }

    #[test]
    fn test_fast_and_full_paths_agree() {
        let mut tree = DomTree::new();
        let html = element(&mut tree, NodeId::ROOT, "html");
        let a = element(&mut tree, html, "p");
        let b = element(&mut tree, html, "P");
        tree.set_attribute(a, "class", "x y").unwrap();
        tree.set_attribute(b, "id", "b").unwrap();

        let errors = ErrorLog::new();
        let cx = QueryContext::new(&tree, &errors);
        let engine = SelectorEngine::new();
        assert_eq!(engine.select(&cx, NodeId::ROOT, "p"), vec![a, b]);
        assert_eq!(engine.select(&cx, NodeId::ROOT, "*:not(html)"), vec![a, b]);
        assert_eq!(engine.select(&cx, NodeId::ROOT, ".y"), vec![a]);
        assert_eq!(engine.select(&cx, NodeId::ROOT, "[class~=y]"), vec![a]);
        assert_eq!(engine.select(&cx, NodeId::ROOT, "#b"), vec![b]);
        assert_eq!(engine.select(&cx, html, "html#b, p#b"), vec![b]);
        assert!(engine.matches(&cx, b, "p"));
        assert!(engine.matches(&cx, b, "html > #b"));
        assert!(!engine.matches(&cx, a, "#b"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_invalid_selector_logged_once() {
        let tree = DomTree::new();
        let errors = ErrorLog::new();
        let cx = QueryContext::new(&tree, &errors);
        let engine = SelectorEngine::new();

        assert!(engine.select(&cx, NodeId::ROOT, "div[").is_empty());
        assert!(!engine.matches(&cx, NodeId::ROOT, "div["));
        assert_eq!(errors.len(), 1);
        assert!(errors.entries()[0].starts_with("Invalid selector 'div['"));
        assert_eq!(engine.cache_len(), 1);
    }

    #[test]
    fn test_unknown_node_uses_fallback() {
        let tree = DomTree::new();
        let errors = ErrorLog::new();
        let cx = QueryContext::new(&tree, &errors);
        let engine = SelectorEngine::new();

        assert!(engine.select(&cx, NodeId(42), "div > p").is_empty());
        assert!(!engine.matches(&cx, NodeId(42), "div > p"));
        assert_eq!(errors.len(), 2);
        assert!(errors.entries()[0].starts_with("Error selecting with 'div > p'"));
    }
}
