//! Terminal output for documents and query results.

use larch_dom::{DomTree, NodeId, NodeKind};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Print the subtree at `id`, one node per line, indented by depth.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match node.kind() {
        NodeKind::Document => println!("{prefix}{}", "Document".bold()),
        NodeKind::DocumentFragment => println!("{prefix}{}", "#document-fragment".bold()),
        NodeKind::DocumentType(doctype) => {
            println!("{prefix}{}", format!("<!DOCTYPE {}>", doctype.name).dimmed());
        }
        NodeKind::Element(_) => println!("{prefix}{}", label(tree, id).cyan()),
        NodeKind::Text(data) => {
            let display = data.data().replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{prefix}\"{display}\"");
        }
        NodeKind::Comment(data) => {
            println!("{prefix}{}", format!("<!-- {} -->", data.data()).dimmed());
        }
    }
    for &child in tree.children(id) {
        print_tree(tree, child, indent + 1);
    }
}

/// `<tag id=".." class="..">`, or the node name for non-elements.
#[must_use]
pub fn label(tree: &DomTree, id: NodeId) -> String {
    let Some(element) = tree.as_element(id) else {
        return tree.node_name(id).unwrap_or("?").to_string();
    };
    if !element.has_attributes() {
        return format!("<{}>", element.tag_name());
    }
    let attrs: Vec<String> = element
        .attributes()
        .iter()
        .map(|attr| {
            if attr.value().is_empty() {
                attr.name().to_string()
            } else {
                format!("{}=\"{}\"", attr.name(), attr.value())
            }
        })
        .collect();
    format!("<{} {}>", element.tag_name(), attrs.join(" "))
}

/// One matched element in `--json` output.
#[derive(Debug, Serialize)]
pub struct MatchReport {
    node: usize,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
}

impl MatchReport {
    /// Describe an element of `tree`.
    #[must_use]
    pub fn new(tree: &DomTree, node: NodeId) -> Self {
        let element = tree.as_element(node);
        Self {
            node: node.0,
            tag: element.map(|e| e.tag_name().to_string()).unwrap_or_default(),
            id: element.and_then(|e| e.id()).map(str::to_string),
            classes: element
                .map(|e| e.class_list().iter().map(str::to_string).collect())
                .unwrap_or_default(),
            text: tree.text_content(node).trim().to_string(),
        }
    }
}

/// The results of one `--select` in `--json` output.
#[derive(Debug, Serialize)]
pub struct QueryReport {
    selector: String,
    matches: Vec<MatchReport>,
}

impl QueryReport {
    /// Describe the nodes `selector` matched.
    #[must_use]
    pub fn new(tree: &DomTree, selector: &str, nodes: &[NodeId]) -> Self {
        Self {
            selector: selector.to_string(),
            matches: nodes.iter().map(|&n| MatchReport::new(tree, n)).collect(),
        }
    }
}

/// Print the matches of one selector.
pub fn print_matches(tree: &DomTree, selector: &str, nodes: &[NodeId]) {
    println!(
        "{} {} ({} match{})",
        "==>".green().bold(),
        selector.bold(),
        nodes.len(),
        if nodes.len() == 1 { "" } else { "es" }
    );
    for &node in nodes {
        let text = tree.text_content(node);
        let text = text.trim();
        if text.is_empty() {
            println!("  [{}] {}", node.0, label(tree, node));
        } else {
            let preview: String = text.chars().take(40).collect();
            let suffix = if text.chars().count() > 40 { "..." } else { "" };
            println!(
                "  [{}] {} {}",
                node.0,
                label(tree, node),
                format!("\"{preview}{suffix}\"").dimmed()
            );
        }
    }
}
