//! Tests for tree mutation: append, insert, remove, replace, clone, normalize.

use larch_dom::{Document, DomError, DomTree, NodeId, NodeType};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// A document with a `div` container in its body.
fn setup() -> (Document, NodeId) {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let container = doc.create_element("div", None);
    let _ = doc.tree_mut().append_child(body, container).unwrap();
    (doc, container)
}

fn children_of(doc: &mut Document, parent: NodeId, tags: &[&str]) -> Vec<NodeId> {
    tags.iter()
        .map(|tag| {
            let child = doc.create_element(tag, None);
            let _ = doc.tree_mut().append_child(parent, child).unwrap();
            child
        })
        .collect()
}

/// Every attached node sits exactly once in its parent's child list, the
/// sibling links agree with that list, and detached nodes have no links.
fn assert_consistent(tree: &DomTree) {
    for index in 0..tree.len() {
        let id = NodeId(index);
        match tree.parent(id) {
            Some(parent) => {
                let siblings = tree.children(parent);
                let positions: Vec<_> = siblings
                    .iter()
                    .enumerate()
                    .filter(|&(_, &c)| c == id)
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(positions.len(), 1, "{id:?} listed {positions:?}");
                let at = positions[0];
                let prev = at.checked_sub(1).map(|i| siblings[i]);
                assert_eq!(tree.prev_sibling(id), prev);
                assert_eq!(tree.next_sibling(id), siblings.get(at + 1).copied());
                assert!(tree.ancestors(id).count() < tree.len());
            }
            None => {
                assert_eq!(tree.prev_sibling(id), None);
                assert_eq!(tree.next_sibling(id), None);
            }
        }
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
        assert_eq!(tree.first_child(id), tree.children(id).first().copied());
        assert_eq!(tree.last_child(id), tree.children(id).last().copied());
    }
}

// ========== append_child / insert_before ==========

#[test]
fn test_append_child_links_siblings() {
    let (mut doc, parent) = setup();
    let [a, b, c] = children_of(&mut doc, parent, &["a", "b", "c"])[..] else {
        panic!("expected three children");
    };
    let tree = doc.tree();
    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(c));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_consistent(tree);
}

#[test]
fn test_append_moves_from_previous_parent() {
    let (mut doc, first) = setup();
    let second = doc.create_element("section", None);
    let body = doc.body().unwrap();
    let _ = doc.tree_mut().append_child(body, second).unwrap();
    let [a, b] = children_of(&mut doc, first, &["a", "b"])[..] else {
        panic!("expected two children");
    };

    let _ = doc.tree_mut().append_child(second, a).unwrap();
    let tree = doc.tree();
    assert_eq!(tree.children(first), &[b]);
    assert_eq!(tree.children(second), &[a]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_consistent(tree);
}

#[test]
fn test_append_is_idempotent_for_last_child() {
    let (mut doc, parent) = setup();
    let [a, b] = children_of(&mut doc, parent, &["a", "b"])[..] else {
        panic!("expected two children");
    };
    let _ = doc.tree_mut().append_child(parent, b).unwrap();
    let _ = doc.tree_mut().append_child(parent, b).unwrap();
    assert_eq!(doc.tree().children(parent), &[a, b]);

    let _ = doc.tree_mut().append_child(parent, a).unwrap();
    assert_eq!(doc.tree().children(parent), &[b, a]);
    assert_consistent(doc.tree());
}

#[test]
fn test_insert_before() {
    let (mut doc, parent) = setup();
    let [a, c] = children_of(&mut doc, parent, &["a", "c"])[..] else {
        panic!("expected two children");
    };
    let b = doc.create_element("b", None);
    let _ = doc.tree_mut().insert_before(parent, b, Some(c)).unwrap();
    assert_eq!(doc.tree().children(parent), &[a, b, c]);

    let d = doc.create_element("d", None);
    let _ = doc.tree_mut().insert_before(parent, d, None).unwrap();
    assert_eq!(doc.tree().children(parent), &[a, b, c, d]);

    let _ = doc.tree_mut().insert_before(parent, b, Some(b)).unwrap();
    assert_eq!(doc.tree().children(parent), &[a, b, c, d]);

    let _ = doc.tree_mut().insert_before(parent, d, Some(a)).unwrap();
    assert_eq!(doc.tree().children(parent), &[d, a, b, c]);
    assert_consistent(doc.tree());
}

#[test]
fn test_insert_before_foreign_reference() {
    let (mut doc, parent) = setup();
    let stranger = doc.create_element("p", None);
    let child = doc.create_element("span", None);
    assert_eq!(
        doc.tree_mut().insert_before(parent, child, Some(stranger)),
        Err(DomError::InvalidReference {
            parent,
            reference: stranger
        })
    );
    assert_eq!(doc.tree().parent(child), None);
}

#[test]
fn test_cyclic_insert_is_rejected() {
    let (mut doc, parent) = setup();
    let [child] = children_of(&mut doc, parent, &["p"])[..] else {
        panic!("expected one child");
    };
    assert_eq!(
        doc.tree_mut().append_child(child, parent),
        Err(DomError::HierarchyRequest {
            parent: child,
            child: parent
        })
    );
    assert!(doc.tree_mut().append_child(parent, parent).is_err());
    assert!(doc.tree_mut().append_child(parent, NodeId::ROOT).is_err());

    let text = doc.create_text_node("x");
    let span = doc.create_element("span", None);
    assert!(matches!(
        doc.tree_mut().append_child(text, span),
        Err(DomError::HierarchyRequest { .. })
    ));
    assert_consistent(doc.tree());
}

#[test]
fn test_fragment_children_are_moved() {
    let (mut doc, parent) = setup();
    let fragment = doc.create_document_fragment();
    let [a, b] = children_of(&mut doc, fragment, &["a", "b"])[..] else {
        panic!("expected two children");
    };
    let _ = doc.tree_mut().append_child(parent, fragment).unwrap();
    assert_eq!(doc.tree().children(parent), &[a, b]);
    assert!(!doc.tree().has_child_nodes(fragment));
    assert_eq!(doc.tree().parent(fragment), None);
    assert_consistent(doc.tree());
}

// ========== remove_child / replace_child ==========

#[test]
fn test_remove_child() {
    let (mut doc, parent) = setup();
    let [a, b, c] = children_of(&mut doc, parent, &["a", "b", "c"])[..] else {
        panic!("expected three children");
    };
    let grandchild = doc.create_element("i", None);
    let _ = doc.tree_mut().append_child(b, grandchild).unwrap();

    assert_eq!(doc.tree_mut().remove_child(parent, b), Ok(b));
    let tree = doc.tree();
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.children(b), &[grandchild]);
    assert_consistent(tree);

    assert_eq!(
        doc.tree_mut().remove_child(parent, b),
        Err(DomError::NotFound { parent, child: b })
    );
}

#[test]
fn test_replace_child() {
    let (mut doc, parent) = setup();
    let [a, b, c] = children_of(&mut doc, parent, &["a", "b", "c"])[..] else {
        panic!("expected three children");
    };
    let x = doc.create_element("x", None);
    assert_eq!(doc.tree_mut().replace_child(parent, x, b), Ok(b));
    assert_eq!(doc.tree().children(parent), &[a, x, c]);
    assert_eq!(doc.tree().parent(b), None);

    // Replacing with the following sibling.
    assert_eq!(doc.tree_mut().replace_child(parent, c, x), Ok(x));
    assert_eq!(doc.tree().children(parent), &[a, c]);

    assert_eq!(doc.tree_mut().replace_child(parent, a, a), Ok(a));
    assert_eq!(doc.tree().children(parent), &[a, c]);

    assert_eq!(
        doc.tree_mut().replace_child(parent, b, x),
        Err(DomError::NotFound { parent, child: x })
    );
    assert_consistent(doc.tree());
}

// ========== clone / equality ==========

#[test]
fn test_clone_node() {
    let (mut doc, parent) = setup();
    doc.tree_mut().set_attribute(parent, "class", "box").unwrap();
    let [p] = children_of(&mut doc, parent, &["p"])[..] else {
        panic!("expected one child");
    };
    let text = doc.create_text_node("hello");
    let _ = doc.tree_mut().append_child(p, text).unwrap();

    let shallow = doc.tree_mut().clone_node(parent, false).unwrap();
    assert!(!doc.tree().has_child_nodes(shallow));
    assert_eq!(
        doc.tree().element(shallow).unwrap().get_attribute("class"),
        Some("box")
    );

    let deep = doc.tree_mut().clone_node(parent, true).unwrap();
    let tree = doc.tree();
    assert_eq!(tree.parent(deep), None);
    assert!(tree.is_equal_node(parent, deep));
    assert_ne!(tree.children(deep), tree.children(parent));
    assert_eq!(tree.text_content(deep), "hello");

    assert!(matches!(
        doc.tree_mut().clone_node(NodeId::ROOT, true),
        Err(DomError::WrongNodeType {
            actual: NodeType::Document,
            ..
        })
    ));
}

#[test]
fn test_is_equal_node_ignores_attribute_order() {
    let mut doc = Document::new();
    let a = doc.create_element("div", None);
    let b = doc.create_element("div", None);
    let tree = doc.tree_mut();
    tree.set_attribute(a, "id", "x").unwrap();
    tree.set_attribute(a, "title", "t").unwrap();
    tree.set_attribute(b, "title", "t").unwrap();
    tree.set_attribute(b, "id", "x").unwrap();
    assert!(tree.is_equal_node(a, b));

    tree.set_attribute(b, "id", "y").unwrap();
    assert!(!tree.is_equal_node(a, b));
}

#[test]
fn test_contains() {
    let (doc, parent) = setup();
    let tree = doc.tree();
    let body = doc.body().unwrap();
    assert!(tree.contains(body, parent));
    assert!(tree.contains(parent, parent));
    assert!(!tree.contains(parent, body));
    assert!(tree.contains(NodeId::ROOT, parent));
}

// ========== text ==========

#[test]
fn test_text_content_is_deep() {
    let (mut doc, parent) = setup();
    let one = doc.create_text_node("one ");
    let em = doc.create_element("em", None);
    let two = doc.create_text_node("two");
    let note = doc.create_comment("skip");
    for child in [one, em, note] {
        let _ = doc.tree_mut().append_child(parent, child).unwrap();
    }
    let _ = doc.tree_mut().append_child(em, two).unwrap();
    assert_eq!(doc.text_content(parent), "one two");

    doc.tree_mut().set_text_content(parent, "replaced").unwrap();
    assert_eq!(doc.tree().children(parent).len(), 1);
    assert_eq!(doc.text_content(parent), "replaced");
    assert_eq!(doc.tree().parent(em), None);

    doc.tree_mut().set_text_content(parent, "").unwrap();
    assert!(!doc.tree().has_child_nodes(parent));
}

#[test]
fn test_normalize_merges_and_drops_empty() {
    let (mut doc, parent) = setup();
    let texts: Vec<_> = ["a", "", "b", "c"]
        .iter()
        .map(|data| doc.create_text_node(data))
        .collect();
    let br = doc.create_element("br", None);
    let tail = doc.create_text_node("d");
    for &child in texts.iter().chain([br, tail].iter()) {
        let _ = doc.tree_mut().append_child(parent, child).unwrap();
    }

    doc.tree_mut().normalize(parent).unwrap();
    let tree = doc.tree();
    assert_eq!(tree.children(parent), &[texts[0], br, tail]);
    assert_eq!(tree.data(texts[0]), Ok("abc"));
    assert_consistent(tree);
}

// ========== properties ==========

#[derive(Debug, Clone)]
enum Op {
    Append(u8, u8),
    InsertBefore(u8, u8, u8),
    Remove(u8, u8),
    Replace(u8, u8, u8),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        let (a, b, c) = (u8::arbitrary(g), u8::arbitrary(g), u8::arbitrary(g));
        match u8::arbitrary(g) % 4 {
            0 => Self::Append(a, b),
            1 => Self::InsertBefore(a, b, c),
            2 => Self::Remove(a, b),
            _ => Self::Replace(a, b, c),
        }
    }
}

const POOL: usize = 8;

/// Arbitrary mutation sequences over a pool of elements and text nodes
/// always leave the tree consistent. Failed operations must not corrupt it.
#[quickcheck]
fn prop_tree_stays_consistent(ops: Vec<Op>) -> bool {
    let mut doc = Document::new();
    let pool: Vec<NodeId> = (0..POOL)
        .map(|i| {
            if i % 3 == 2 {
                doc.create_text_node("t")
            } else {
                doc.create_element("div", None)
            }
        })
        .collect();
    let pick = |n: u8| pool[usize::from(n) % POOL];

    for op in ops {
        let tree = doc.tree_mut();
        let _ = match op {
            Op::Append(p, c) => tree.append_child(pick(p), pick(c)),
            Op::InsertBefore(p, c, r) => tree.insert_before(pick(p), pick(c), Some(pick(r))),
            Op::Remove(p, c) => tree.remove_child(pick(p), pick(c)),
            Op::Replace(p, n, o) => tree.replace_child(pick(p), pick(n), pick(o)),
        };
    }
    assert_consistent(doc.tree());
    true
}

/// After `normalize`, no two adjacent children are both text and no text
/// child is empty.
#[quickcheck]
fn prop_normalize_postcondition(pieces: Vec<Option<String>>) -> bool {
    let (mut doc, parent) = setup();
    for piece in &pieces {
        let child = match piece {
            Some(data) => doc.create_text_node(data),
            None => doc.create_element("b", None),
        };
        let _ = doc.tree_mut().append_child(parent, child).unwrap();
    }
    let before = doc.text_content(parent);

    doc.tree_mut().normalize(parent).unwrap();
    let tree = doc.tree();
    let children = tree.children(parent);
    let is_text = |id: &NodeId| tree.node_type(*id) == Some(NodeType::Text);
    let no_adjacent = children.windows(2).all(|w| !(is_text(&w[0]) && is_text(&w[1])));
    let no_empty = children
        .iter()
        .filter(|id| is_text(id))
        .all(|&id| tree.length(id).is_ok_and(|len| len > 0));
    no_adjacent && no_empty && doc.text_content(parent) == before
}
