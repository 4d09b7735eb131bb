//! Selector matching against the DOM tree.
//!
//! [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)

use larch_common::warn_once;
use thiserror::Error;

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorList,
    SimpleSelector,
};
use crate::element::ElementData;
use crate::node::{NodeId, NodeType};
use crate::tree::DomTree;

/// Matching could not be carried out at all, as opposed to "no match".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The handle does not refer to a node of the tree being matched.
    #[error("{0:?} is not a node of this tree")]
    UnknownNode(NodeId),
}

impl SelectorList {
    /// Whether `node` matches any alternative of the list.
    ///
    /// Non-element nodes never match.
    ///
    /// # Errors
    ///
    /// [`MatchError::UnknownNode`] if `node` is not part of `tree`.
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> Result<bool, MatchError> {
        if tree.get(node).is_none() {
            return Err(MatchError::UnknownNode(node));
        }
        Ok(self.matches_unchecked(tree, node))
    }

    /// The element descendants of `scope` matching the list, in document order.
    ///
    /// # Errors
    ///
    /// [`MatchError::UnknownNode`] if `scope` is not part of `tree`.
    pub fn select(&self, tree: &DomTree, scope: NodeId) -> Result<Vec<NodeId>, MatchError> {
        if tree.get(scope).is_none() {
            return Err(MatchError::UnknownNode(scope));
        }
        Ok(tree
            .element_descendants(scope)
            .filter(|&id| self.matches_unchecked(tree, id))
            .collect())
    }

    /// Comma lists: OR across alternatives.
    fn matches_unchecked(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors
            .iter()
            .any(|complex| complex.matches_in_tree(tree, node))
    }
}

impl ComplexSelector {
    /// Match against an element with full tree context.
    ///
    /// The subject must match `node`; every combinator step to the left then
    /// has to be satisfied by some element in the required relationship.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node: NodeId) -> bool {
        compound_matches(&self.subject, tree, node) && matches_chain(&self.combinators, tree, node)
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// Walk the combinator chain outward from `current`. Descendant and
/// subsequent-sibling steps try every candidate, so `a b > c` succeeds if
/// any ancestor assignment works, not just the nearest one.
fn matches_chain(
    chain: &[(Combinator, CompoundSelector)],
    tree: &DomTree,
    current: NodeId,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let satisfies = |candidate: NodeId| {
        compound_matches(compound, tree, candidate) && matches_chain(rest, tree, candidate)
    };

    match combinator {
        // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        Combinator::Descendant => tree.ancestors(current).any(satisfies),

        // [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
        Combinator::Child => tree.parent(current).is_some_and(satisfies),

        // [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
        // Text and comment nodes in between are skipped.
        Combinator::NextSibling => tree.previous_element_sibling(current).is_some_and(satisfies),

        // [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
        Combinator::SubsequentSibling => tree
            .preceding_siblings(current)
            .filter(|&sibling| tree.as_element(sibling).is_some())
            .any(satisfies),
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// AND over every member. Only elements can match.
fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| simple_matches(simple, tree, node, element))
}

fn simple_matches(
    simple: &SimpleSelector,
    tree: &DomTree,
    node: NodeId,
    element: &ElementData,
) -> bool {
    match simple {
        // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
        SimpleSelector::Type(name) => element.tag_name().eq_ignore_ascii_case(name),

        // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
        SimpleSelector::Universal => true,

        // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
        SimpleSelector::Class(class_name) => element.class_list().contains(class_name),

        // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),

        SimpleSelector::Attribute(selector) => attribute_matches(selector, element),

        SimpleSelector::PseudoClass(pseudo) => pseudo_class_matches(pseudo, tree, node),

        // [§ 4.3 The Negation Pseudo-class](https://www.w3.org/TR/selectors-4/#negation)
        SimpleSelector::Negation(inner) => !inner.matches_unchecked(tree, node),
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
fn attribute_matches(selector: &AttributeSelector, element: &ElementData) -> bool {
    match selector {
        // [attr]: has attribute
        AttributeSelector::Exists(name) => element.has_attribute(name),
        // [attr=value]: exact match
        AttributeSelector::Equals(name, val) => {
            element.get_attribute(name).is_some_and(|v| v == val)
        }
        // [attr~=value]: whitespace-separated word match. An empty or
        // multi-word `val` never matches. A hyphenated `val` only matches
        // inside a list of several words: a lone hyphenated value such as
        // `data-x="foo-bar"` is one compound word and is left to `|=`.
        AttributeSelector::Includes(name, val) => {
            if val.is_empty() || val.contains(|c: char| c.is_ascii_whitespace()) {
                return false;
            }
            element.get_attribute(name).is_some_and(|v| {
                v.split_ascii_whitespace().any(|w| w == val)
                    && (!val.contains('-') || v.split_ascii_whitespace().nth(1).is_some())
            })
        }
        // [attr|=value]: exact or prefix with hyphen
        AttributeSelector::DashMatch(name, val) => element.get_attribute(name).is_some_and(|v| {
            v == val
                || v.strip_prefix(val.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }),
        // [attr^=value]: starts with
        AttributeSelector::PrefixMatch(name, val) => {
            element.get_attribute(name).is_some_and(|v| v.starts_with(val.as_str()))
        }
        // [attr$=value]: ends with
        AttributeSelector::SuffixMatch(name, val) => {
            element.get_attribute(name).is_some_and(|v| v.ends_with(val.as_str()))
        }
        // [attr*=value]: substring
        AttributeSelector::SubstringMatch(name, val) => {
            element.get_attribute(name).is_some_and(|v| v.contains(val.as_str()))
        }
    }
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Match a structural pseudo-class against an element with full tree context.
fn pseudo_class_matches(pseudo: &PseudoClass, tree: &DomTree, node: NodeId) -> bool {
    match pseudo {
        // [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
        PseudoClass::Root => tree
            .parent(node)
            .is_some_and(|parent| tree.node_type(parent) == Some(NodeType::Document)),

        // [§ 4.12 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
        PseudoClass::FirstChild => tree
            .parent(node)
            .is_some_and(|parent| tree.first_element_child(parent) == Some(node)),

        // [§ 4.12 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
        PseudoClass::LastChild => tree
            .parent(node)
            .is_some_and(|parent| tree.last_element_child(parent) == Some(node)),

        // [§ 4.12 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
        PseudoClass::OnlyChild => tree
            .parent(node)
            .is_some_and(|parent| tree.child_element_count(parent) == 1),

        // [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
        // Any child node at all, text or comment included, disqualifies.
        PseudoClass::Empty => !tree.has_child_nodes(node),

        PseudoClass::Unsupported(name) => {
            let _ = warn_once("Selector", &format!("unsupported pseudo-class '{name}'"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::selector::parse_selector_list;

    /// `<html><body><div id="a" class="x"><p></p><span lang="en-US"></span></div></body></html>`
    fn sample_tree() -> (DomTree, [NodeId; 5]) {
        let mut tree = DomTree::new();
        let html = tree.alloc(NodeKind::Element(ElementData::new("html", None)));
        let body = tree.alloc(NodeKind::Element(ElementData::new("body", None)));
        let div = tree.alloc(NodeKind::Element(ElementData::new("div", None)));
        let p = tree.alloc(NodeKind::Element(ElementData::new("p", None)));
        let span = tree.alloc(NodeKind::Element(ElementData::new("span", None)));
        let _ = tree.append_child(NodeId::ROOT, html).unwrap();
        let _ = tree.append_child(html, body).unwrap();
        let _ = tree.append_child(body, div).unwrap();
        let _ = tree.append_child(div, p).unwrap();
        let _ = tree.append_child(div, span).unwrap();
        tree.set_attribute(div, "id", "a").unwrap();
        tree.set_attribute(div, "class", "x").unwrap();
        tree.set_attribute(span, "lang", "en-US").unwrap();
        (tree, [html, body, div, p, span])
    }

    fn select(tree: &DomTree, selector: &str) -> Vec<NodeId> {
        parse_selector_list(selector)
            .unwrap()
            .select(tree, NodeId::ROOT)
            .unwrap()
    }

    #[test]
    fn test_compound_and_combinators() {
        let (tree, [_, body, div, p, span]) = sample_tree();
        assert_eq!(select(&tree, "div#a.x"), vec![div]);
        assert_eq!(select(&tree, "body > div > p"), vec![p]);
        assert_eq!(select(&tree, "body p"), vec![p]);
        assert_eq!(select(&tree, "p + span"), vec![span]);
        assert_eq!(select(&tree, "p ~ span, body"), vec![body, span]);
        assert!(select(&tree, "span + p").is_empty());
    }

    #[test]
    fn test_descendant_backtracks() {
        // html > body > div > p: the nearest `div` ancestor of p is not a
        // child of `html`, but the `body` ancestor is.
        let (tree, [_, _, _, p, _]) = sample_tree();
        assert_eq!(select(&tree, "html > * p"), vec![p]);
        assert_eq!(select(&tree, "html > body div > p"), vec![p]);
    }

    #[test]
    fn test_pseudo_classes() {
        let (tree, [html, _, div, p, span]) = sample_tree();
        assert_eq!(select(&tree, ":root"), vec![html]);
        assert_eq!(select(&tree, "div > :first-child"), vec![p]);
        assert_eq!(select(&tree, "div > :last-child"), vec![span]);
        assert_eq!(select(&tree, ":only-child"), vec![html, tree.parent(div).unwrap(), div]);
        assert_eq!(select(&tree, "div :empty"), vec![p, span]);
        assert!(select(&tree, "p:hover").is_empty());
    }

    #[test]
    fn test_attribute_operators() {
        let (tree, [_, _, _, _, span]) = sample_tree();
        assert_eq!(select(&tree, "[lang|=en]"), vec![span]);
        assert_eq!(select(&tree, "[LANG^=en]"), vec![span]);
        assert_eq!(select(&tree, "[lang$=US]"), vec![span]);
        assert_eq!(select(&tree, "[lang*='n-U']"), vec![span]);
        assert!(select(&tree, "[lang=en]").is_empty());
        assert!(select(&tree, "[lang~=en-US]").is_empty());
    }

    #[test]
    fn test_negation() {
        let (tree, [_, _, _, p, span]) = sample_tree();
        assert_eq!(select(&tree, "div > :not(span)"), vec![p]);
        assert_eq!(select(&tree, "div > :not(p, .y)"), vec![span]);
    }

    #[test]
    fn test_unknown_node() {
        let (tree, _) = sample_tree();
        let list = parse_selector_list("p").unwrap();
        assert_eq!(
            list.matches(&tree, NodeId(999)),
            Err(MatchError::UnknownNode(NodeId(999)))
        );
        assert!(list.select(&tree, NodeId(999)).is_err());
        assert!(!list.matches(&tree, NodeId::ROOT).unwrap());
    }
}
