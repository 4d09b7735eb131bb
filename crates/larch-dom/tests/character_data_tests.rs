//! Tests for text and comment data operations.

use larch_dom::{Document, DomError, NodeId, NodeType};

fn text_in_div(data: &str) -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let div = doc.create_element("div", None);
    let text = doc.create_text_node(data);
    let _ = doc.tree_mut().append_child(div, text).unwrap();
    (doc, div, text)
}

#[test]
fn test_substring_boundaries() {
    let (doc, _, text) = text_in_div("Hello");
    let tree = doc.tree();
    assert_eq!(tree.substring_data(text, 5, 3), Ok(String::new()));
    assert_eq!(tree.substring_data(text, 0, 2), Ok("He".to_string()));
    assert_eq!(tree.substring_data(text, 3, 99), Ok("lo".to_string()));
    assert_eq!(
        tree.substring_data(text, 6, 1),
        Err(DomError::Range {
            offset: 6,
            length: 5
        })
    );
}

#[test]
fn test_edits_update_length() {
    let (mut doc, _, text) = text_in_div("Hello");
    let tree = doc.tree_mut();

    tree.append_data(text, " world").unwrap();
    assert_eq!(tree.length(text), Ok(11));

    tree.insert_data(text, 5, ",").unwrap();
    assert_eq!(tree.data(text), Ok("Hello, world"));

    tree.delete_data(text, 5, 1).unwrap();
    assert_eq!(tree.data(text), Ok("Hello world"));

    tree.replace_data(text, 6, 5, "there").unwrap();
    assert_eq!(tree.data(text), Ok("Hello there"));

    tree.delete_data(text, 5, 100).unwrap();
    assert_eq!(tree.data(text), Ok("Hello"));
    assert_eq!(tree.length(text), Ok(5));

    assert!(matches!(
        tree.insert_data(text, 6, "!"),
        Err(DomError::Range { .. })
    ));
    assert_eq!(tree.data(text), Ok("Hello"));
}

#[test]
fn test_offsets_are_characters() {
    let (mut doc, _, text) = text_in_div("naïve café");
    let tree = doc.tree_mut();
    assert_eq!(tree.length(text), Ok(10));
    assert_eq!(tree.substring_data(text, 2, 3), Ok("ïve".to_string()));
    tree.replace_data(text, 9, 1, "e").unwrap();
    assert_eq!(tree.data(text), Ok("naïve cafe"));
}

#[test]
fn test_comment_data() {
    let mut doc = Document::new();
    let comment = doc.create_comment("note");
    let tree = doc.tree_mut();
    tree.append_data(comment, "s").unwrap();
    assert_eq!(tree.data(comment), Ok("notes"));
    assert_eq!(tree.node_type(comment), Some(NodeType::Comment));
}

#[test]
fn test_non_character_data_is_rejected() {
    let mut doc = Document::new();
    let div = doc.create_element("div", None);
    assert!(matches!(
        doc.tree_mut().append_data(div, "x"),
        Err(DomError::WrongNodeType {
            actual: NodeType::Element,
            ..
        })
    ));
    assert_eq!(
        doc.tree().data(NodeId(9999)),
        Err(DomError::UnknownNode(NodeId(9999)))
    );
}

#[test]
fn test_split_text() {
    let (mut doc, div, text) = text_in_div("Hello world");
    let tail = doc.tree_mut().split_text(text, 6).unwrap();
    let tree = doc.tree();
    assert_eq!(tree.data(text), Ok("Hello "));
    assert_eq!(tree.data(tail), Ok("world"));
    assert_eq!(tree.children(div), &[text, tail]);
    assert_eq!(tree.next_sibling(text), Some(tail));
    assert_eq!(tree.whole_text(tail), Ok("Hello world".to_string()));
}

#[test]
fn test_split_text_at_zero_and_end() {
    let (mut doc, div, text) = text_in_div("abc");
    let all = doc.tree_mut().split_text(text, 0).unwrap();
    assert_eq!(doc.tree().data(text), Ok(""));
    assert_eq!(doc.tree().data(all), Ok("abc"));

    let empty = doc.tree_mut().split_text(all, 3).unwrap();
    assert_eq!(doc.tree().data(empty), Ok(""));
    assert_eq!(doc.tree().children(div), &[text, all, empty]);

    assert!(matches!(
        doc.tree_mut().split_text(all, 4),
        Err(DomError::Range { .. })
    ));
}

#[test]
fn test_split_detached_text() {
    let mut doc = Document::new();
    let text = doc.create_text_node("ab");
    let tail = doc.tree_mut().split_text(text, 1).unwrap();
    assert_eq!(doc.tree().parent(tail), None);
    assert_eq!(doc.tree().data(tail), Ok("b"));

    let comment = doc.create_comment("ab");
    assert!(matches!(
        doc.tree_mut().split_text(comment, 1),
        Err(DomError::WrongNodeType { .. })
    ));
}

#[test]
fn test_whole_text_stops_at_elements() {
    let (mut doc, div, first) = text_in_div("a");
    let second = doc.create_text_node("b");
    let br = doc.create_element("br", None);
    let third = doc.create_text_node("c");
    for child in [second, br, third] {
        let _ = doc.tree_mut().append_child(div, child).unwrap();
    }
    assert_eq!(doc.tree().whole_text(first), Ok("ab".to_string()));
    assert_eq!(doc.tree().whole_text(third), Ok("c".to_string()));
}

#[test]
fn test_data_edits_bump_generation() {
    let (mut doc, _, text) = text_in_div("x");
    let before = doc.tree().generation();
    doc.tree_mut().set_data(text, "y").unwrap();
    assert_ne!(doc.tree().generation(), before);
}
