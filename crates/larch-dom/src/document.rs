//! [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//!
//! The document owns the node arena and everything that is document-wide:
//! URL and title, the error log, the id index and the selector engine.

use std::fmt;
use std::iter;

use larch_common::clear_warnings;
use strum_macros::Display;
use url::Url;

use crate::attr::Attr;
use crate::character_data::CharacterData;
use crate::element::ElementData;
use crate::error::{DomResult, ErrorLog};
use crate::index::IdIndex;
use crate::node::{DocumentTypeData, NodeId, NodeKind, NodeType};
use crate::selector::{QueryContext, SelectorEngine};
use crate::source::{HtmlParser, ParseError, ParsedDocument, ParsedNode};
use crate::tree::DomTree;

/// [§ 3.1.1 Current document readiness](https://html.spec.whatwg.org/multipage/dom.html#current-document-readiness)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReadyState {
    /// The document is still being built.
    Loading,
    /// Parsing finished; subresources may still be loading.
    Interactive,
    /// The document is fully loaded.
    Complete,
}

/// An HTML document: the root of a DOM tree plus document-wide state.
///
/// A fresh document already holds `html > (head, body)`.
pub struct Document {
    tree: DomTree,
    url: Option<String>,
    /// Set by [`Document::set_domain`]; otherwise derived from the URL.
    domain: Option<String>,
    /// Last title set or loaded; empty means "read it from `<title>`".
    title: String,
    ready_state: ReadyState,
    character_set: &'static str,
    content_type: &'static str,
    errors: ErrorLog,
    engine: SelectorEngine,
    id_index: IdIndex,
    parser: Option<Box<dyn HtmlParser>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("title", &self.title)
            .field("ready_state", &self.ready_state)
            .field("nodes", &self.tree.len())
            .field("errors", &self.errors.len())
            .field("has_parser", &self.parser.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A blank document with the `html`, `head` and `body` elements.
    #[must_use]
    pub fn new() -> Self {
        let mut document = Self {
            tree: DomTree::new(),
            url: None,
            domain: None,
            title: String::new(),
            ready_state: ReadyState::Loading,
            character_set: "UTF-8",
            content_type: "text/html",
            errors: ErrorLog::new(),
            engine: SelectorEngine::new(),
            id_index: IdIndex::new(),
            parser: None,
        };
        document.create_base_structure();
        document
    }

    /// A blank document at `url`.
    #[must_use]
    pub fn with_url(url: &str) -> Self {
        let mut document = Self::new();
        document.set_url(url);
        document
    }

    /// Use `parser` for [`Document::parse_html`], `inner_html` assignment and
    /// [`Document::create_fragment`].
    #[must_use]
    pub fn with_parser(mut self, parser: impl HtmlParser + 'static) -> Self {
        self.set_parser(parser);
        self
    }

    /// Replace the HTML parser.
    pub fn set_parser(&mut self, parser: impl HtmlParser + 'static) {
        self.parser = Some(Box::new(parser));
    }

    /// The node arena.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The node arena, for mutation.
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ----- Errors -----

    /// Record a recovered failure in the error log.
    pub fn handle_error(&self, message: impl Into<String>) {
        self.errors.push(message);
    }

    /// Every recovered failure so far, oldest first.
    #[must_use]
    pub fn get_errors(&self) -> Vec<String> {
        self.errors.entries()
    }

    // ----- Factory -----

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createelement)
    ///
    /// A detached element. Without a namespace the tag is treated as HTML
    /// and its `node_name` is upper-cased.
    pub fn create_element(&mut self, tag: &str, namespace: Option<&str>) -> NodeId {
        self.tree
            .alloc(NodeKind::Element(ElementData::new(tag, namespace)))
    }

    /// A detached text node.
    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.tree.alloc(NodeKind::Text(CharacterData::new(data)))
    }

    /// A detached comment node.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.tree.alloc(NodeKind::Comment(CharacterData::new(data)))
    }

    /// An empty document fragment. Inserting it moves its children.
    pub fn create_document_fragment(&mut self) -> NodeId {
        self.tree.alloc(NodeKind::DocumentFragment)
    }

    /// A detached doctype node.
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.tree.alloc(NodeKind::DocumentType(DocumentTypeData {
            name: name.to_string(),
        }))
    }

    /// A detached attribute with an empty value.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn create_attribute(&self, name: &str) -> Attr {
        Attr::new(name, "")
    }

    /// Parse `html` as a fragment into a new document fragment. A parse
    /// failure is logged and leaves the fragment empty.
    pub fn create_fragment(&mut self, html: &str) -> NodeId {
        let fragment = self.create_document_fragment();
        match self.parse_fragment(html) {
            Ok(nodes) => self.convert_nodes(nodes, fragment),
            Err(e) => self.handle_error(format!("Error parsing HTML fragment: {e}")),
        }
        fragment
    }

    fn parse_fragment(&self, html: &str) -> Result<Vec<ParsedNode>, ParseError> {
        self.parser
            .as_ref()
            .ok_or(ParseError::NoParser)?
            .parse_fragment(html)
    }

    // ----- Queries -----

    fn query_context(&self) -> QueryContext<'_> {
        QueryContext::new(&self.tree, &self.errors).with_id_index(&self.id_index)
    }

    /// [§ 4.2.4](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// The first element in tree order whose id is `id`.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.lookup(&self.tree, id)
    }

    /// Every element with the given tag, in document order.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, name: &str) -> Vec<NodeId> {
        self.tree.get_elements_by_tag_name(NodeId::ROOT, name)
    }

    /// Every element carrying all the given classes, in document order.
    #[must_use]
    pub fn get_elements_by_class_name(&self, names: &str) -> Vec<NodeId> {
        self.tree.get_elements_by_class_name(NodeId::ROOT, names)
    }

    /// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-parentnode-queryselector)
    ///
    /// The first element in the document matching `selector`.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_from(NodeId::ROOT, selector)
    }

    /// Every element in the document matching `selector`, in document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_selector_all_from(NodeId::ROOT, selector)
    }

    /// The first descendant of `scope` matching `selector`.
    #[must_use]
    pub fn query_selector_from(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.query_selector_all_from(scope, selector)
            .into_iter()
            .next()
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    #[must_use]
    pub fn query_selector_all_from(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.engine
            .select(&self.query_context(), scope, selector)
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-matches)
    #[must_use]
    pub fn element_matches(&self, element: NodeId, selector: &str) -> bool {
        self.engine
            .matches(&self.query_context(), element, selector)
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-closest)
    ///
    /// The nearest inclusive ancestor element of `element` matching
    /// `selector`.
    #[must_use]
    pub fn closest(&self, element: NodeId, selector: &str) -> Option<NodeId> {
        let cx = self.query_context();
        iter::once(element)
            .chain(self.tree.ancestors(element))
            .filter(|&node| self.tree.as_element(node).is_some())
            .find(|&node| self.engine.matches(&cx, node, selector))
    }

    // ----- Markup and text -----

    /// The serialized children of `node`.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`](crate::DomError::UnknownNode) for foreign handles.
    pub fn inner_html(&self, node: NodeId) -> DomResult<String> {
        self.tree.inner_html(node)
    }

    /// The serialized node including its children.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`](crate::DomError::UnknownNode) for foreign handles.
    pub fn outer_html(&self, node: NodeId) -> DomResult<String> {
        self.tree.outer_html(node)
    }

    /// Replace the children of `element` with the parsed `html` fragment.
    /// An empty string just clears `element`. A parse failure is logged and
    /// leaves `element` empty.
    ///
    /// # Errors
    ///
    /// [`DomError::WrongNodeType`](crate::DomError::WrongNodeType) if
    /// `element` is not an element, [`DomError::UnknownNode`](crate::DomError::UnknownNode)
    /// for foreign handles.
    pub fn set_inner_html(&mut self, element: NodeId, html: &str) -> DomResult<()> {
        let _ = self.tree.element(element)?;
        self.tree.remove_all_children(element);
        if html.is_empty() {
            return Ok(());
        }
        match self.parse_fragment(html) {
            Ok(nodes) => self.convert_nodes(nodes, element),
            Err(e) => self.handle_error(format!("Error parsing HTML fragment: {e}")),
        }
        Ok(())
    }

    /// Concatenated text of every text node under `node`.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    // ----- Document state -----

    /// [§ 3.1.5 document.title](https://html.spec.whatwg.org/multipage/dom.html#document.title)
    ///
    /// The last title set, or else the text of the `<title>` under `<head>`
    /// with whitespace runs collapsed and the ends stripped.
    #[must_use]
    pub fn title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        self.title_element()
            .map(|title| {
                self.tree
                    .text_content(title)
                    .split_ascii_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// Set the title, updating the `<title>` element under `<head>` or
    /// creating one.
    pub fn set_title(&mut self, value: &str) {
        value.clone_into(&mut self.title);
        let Some(head) = self.tree.head() else {
            return;
        };
        let title = match self.title_element() {
            Some(title) => title,
            None => self.append_new(head, NodeKind::Element(ElementData::new("title", None))),
        };
        if let Err(e) = self.tree.set_text_content(title, value) {
            self.handle_error(format!("Error setting title: {e}"));
        }
    }

    fn title_element(&self) -> Option<NodeId> {
        let head = self.tree.head()?;
        self.tree
            .get_elements_by_tag_name(head, "title")
            .into_iter()
            .next()
    }

    /// The document URL, if one was set.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Set the document URL.
    pub fn set_url(&mut self, url: &str) {
        self.url = Some(url.to_string());
    }

    /// The domain set with [`Document::set_domain`], or else the host of the
    /// URL. Empty when there is neither.
    #[must_use]
    pub fn domain(&self) -> String {
        if let Some(domain) = &self.domain {
            return domain.clone();
        }
        self.url
            .as_deref()
            .and_then(|url| Url::parse(url).ok())
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Override the domain derived from the URL.
    pub fn set_domain(&mut self, domain: &str) {
        self.domain = Some(domain.to_string());
    }

    /// The doctype node among the document's children.
    #[must_use]
    pub fn doctype(&self) -> Option<NodeId> {
        self.tree
            .children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&child| self.tree.node_type(child) == Some(NodeType::DocumentType))
    }

    /// The root element, normally `<html>`.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.document_element()
    }

    /// The `<head>` element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.tree.head()
    }

    /// The `<body>` (or `<frameset>`) element.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.tree.body()
    }

    /// How far loading has got.
    #[must_use]
    pub const fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// The character encoding, `UTF-8`.
    #[must_use]
    pub const fn character_set(&self) -> &'static str {
        self.character_set
    }

    /// The MIME type, `text/html`.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }

    // ----- Loading -----

    /// Parse `html` with the configured parser and load the result.
    /// Blank input loads a placeholder page.
    ///
    /// Returns `false` if parsing failed; the document then holds an empty
    /// shell with an error message in its body.
    pub fn parse_html(&mut self, html: &str) -> bool {
        let result = if html.trim().is_empty() {
            tracing::warn!("empty HTML content provided");
            Ok(placeholder_page())
        } else {
            match &self.parser {
                Some(parser) => parser.parse_document(html),
                None => Err(ParseError::NoParser),
            }
        };
        self.load_parsed(result)
    }

    /// Replace the whole tree with a parse result.
    ///
    /// On success the parsed tree is converted and any missing `html`,
    /// `head` or `body` element is created. On failure the error is logged
    /// and the document gets the minimal shell plus a
    /// `<div class="parsing-error">` in its body.
    pub fn load_parsed(&mut self, result: Result<ParsedDocument, ParseError>) -> bool {
        self.reset();
        let loaded = match result {
            Ok(parsed) => {
                tracing::debug!(doctype = ?parsed.doctype, "loading parsed document");
                self.convert_document(parsed);
                self.ready_state = ReadyState::Interactive;
                self.ensure_structure();
                true
            }
            Err(e) => {
                self.handle_error(format!("Error in HTML parser: {e}"));
                self.create_base_structure();
                if let Some(body) = self.tree.body() {
                    let div = self.append_new(
                        body,
                        NodeKind::Element(
                            ElementData::new("div", None)
                                .with_attributes([("class", "parsing-error")]),
                        ),
                    );
                    let _ = self.append_new(
                        div,
                        NodeKind::Text(CharacterData::new(format!("Error parsing HTML: {e}"))),
                    );
                }
                false
            }
        };
        self.ready_state = ReadyState::Complete;
        tracing::debug!(ready_state = %self.ready_state, "document loaded");
        loaded
    }

    /// Free the old tree and forget page state.
    fn reset(&mut self) {
        self.tree.clear();
        self.title.clear();
        self.ready_state = ReadyState::Loading;
        clear_warnings();
    }

    fn create_base_structure(&mut self) {
        let html = self.append_new(
            NodeId::ROOT,
            NodeKind::Element(ElementData::new("html", None)),
        );
        let _ = self.append_new(html, NodeKind::Element(ElementData::new("head", None)));
        let _ = self.append_new(html, NodeKind::Element(ElementData::new("body", None)));
    }

    /// Allocate a node and append it as the last child of `parent`.
    pub(crate) fn append_new(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.tree.alloc(kind);
        let index = self.tree.children(parent).len();
        self.tree.link_at(parent, id, index);
        id
    }

    /// A diagnostic summary: URL, title, which key nodes exist, node counts
    /// and the element tree down to ten levels.
    #[must_use]
    pub fn debug_structure(&self) -> String {
        let mut lines = vec![
            "Document Structure:".to_string(),
            format!("URL: {}", self.url().unwrap_or("(none)")),
            format!("Title: {}", self.title()),
            format!("Has doctype: {}", self.doctype().is_some()),
            format!("Has document_element: {}", self.document_element().is_some()),
            format!("Has head: {}", self.head().is_some()),
            format!("Has body: {}", self.body().is_some()),
        ];

        let Some(root) = self.document_element() else {
            return lines.join("\n");
        };
        let (mut elements, mut texts, mut comments) = (1usize, 0usize, 0usize);
        for node in self.tree.descendants(root) {
            match self.tree.node_type(node) {
                Some(NodeType::Element) => elements += 1,
                Some(NodeType::Text) => texts += 1,
                Some(NodeType::Comment) => comments += 1,
                _ => {}
            }
        }
        lines.push(format!("Element count: {elements}"));
        lines.push(format!("Text node count: {texts}"));
        lines.push(format!("Comment count: {comments}"));

        lines.push(String::new());
        lines.push("Element tree (first 10 levels):".to_string());
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if let Some(element) = self.tree.as_element(node) {
                lines.push(format!("{}{}", "  ".repeat(depth), element.tag_name()));
            }
            if depth < 10 {
                for &child in self.tree.element_children(node).iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
        lines.join("\n")
    }
}

/// What a blank page loads as.
fn placeholder_page() -> ParsedDocument {
    ParsedDocument {
        doctype: None,
        root: Some(ParsedNode::element(
            "html",
            &[],
            vec![ParsedNode::element(
                "body",
                &[],
                vec![ParsedNode::element(
                    "p",
                    &[],
                    vec![ParsedNode::text("Empty page")],
                )],
            )],
        )),
    }
}
