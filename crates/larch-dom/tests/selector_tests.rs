//! Integration tests for selector queries through the document.

use larch_dom::selector::{Combinator, SelectorParseError, SimpleSelector, parse_selector_list};
use larch_dom::{Document, HtmlParser, NodeId, ParseError, ParsedDocument, ParsedNode};

/// Hands back the same fragment whatever the input.
struct Fragment(Vec<ParsedNode>);

impl HtmlParser for Fragment {
    fn parse_document(&self, _html: &str) -> Result<ParsedDocument, ParseError> {
        Err(ParseError::Malformed("fragments only".to_string()))
    }

    fn parse_fragment(&self, _html: &str) -> Result<Vec<ParsedNode>, ParseError> {
        Ok(self.0.clone())
    }
}

/// A blank document whose body holds `nodes`.
fn body_with(nodes: Vec<ParsedNode>) -> Document {
    let mut doc = Document::new().with_parser(Fragment(nodes));
    let body = doc.body().unwrap();
    doc.set_inner_html(body, "<fragment>").unwrap();
    doc
}

/// ```text
/// html
///   head > title "Fixture"
///   body
///     div#main.container
///       ul.nav
///         li#first.item.active > a[href=/home] "Home"
///         li.item > a[href=https://x.org/page.pdf] "Doc"
///         li#last.item.hidden "gone"
///       p#greeting[lang=en-US][data-x="foo-bar baz"] "hello"
///       p#blank.empty
///     div.outer > div.mid > div.inner > span#deep "deep"
///     <!-- end -->
/// ```
fn fixture() -> Document {
    let el = ParsedNode::element;
    let text = ParsedNode::text;
    let list = el(
        "ul",
        &[("class", "nav")],
        vec![
            el(
                "li",
                &[("id", "first"), ("class", "item active")],
                vec![el("a", &[("href", "/home")], vec![text("Home")])],
            ),
            el(
                "li",
                &[("class", "item")],
                vec![el(
                    "a",
                    &[("href", "https://x.org/page.pdf")],
                    vec![text("Doc")],
                )],
            ),
            el(
                "li",
                &[("id", "last"), ("class", "item hidden")],
                vec![text("gone")],
            ),
        ],
    );
    let main = el(
        "div",
        &[("id", "main"), ("class", "container")],
        vec![
            list,
            el(
                "p",
                &[
                    ("id", "greeting"),
                    ("lang", "en-US"),
                    ("data-x", "foo-bar baz"),
                ],
                vec![text("hello")],
            ),
            el("p", &[("id", "blank"), ("class", "empty")], vec![]),
        ],
    );
    let nested = el(
        "div",
        &[("class", "outer")],
        vec![el(
            "div",
            &[("class", "mid")],
            vec![el(
                "div",
                &[("class", "inner")],
                vec![el("span", &[("id", "deep")], vec![text("deep")])],
            )],
        )],
    );
    let root = el(
        "html",
        &[],
        vec![
            el("head", &[], vec![el("title", &[], vec![text("Fixture")])]),
            el(
                "body",
                &[],
                vec![main, nested, ParsedNode::comment(" end ")],
            ),
        ],
    );

    let mut doc = Document::new();
    assert!(doc.load_parsed(Ok(ParsedDocument {
        doctype: Some("html".to_string()),
        root: Some(root),
    })));
    doc
}

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

fn ids(doc: &Document, selector: &str) -> Vec<String> {
    doc.query_selector_all(selector)
        .into_iter()
        .map(|node| {
            doc.tree()
                .as_element(node)
                .and_then(|e| e.id())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

// ========== Small documents ==========

/// `<div id="a"><p class="x">t1</p><p>t2</p></div>` in the body.
#[test]
fn test_two_paragraphs() {
    let doc = body_with(vec![ParsedNode::element(
        "div",
        &[("id", "a")],
        vec![
            ParsedNode::element("p", &[("class", "x")], vec![ParsedNode::text("t1")]),
            ParsedNode::element("p", &[], vec![ParsedNode::text("t2")]),
        ],
    )]);
    let body = doc.body().unwrap();
    let div = doc.query_selector("#a").unwrap();
    let paragraphs = doc.tree().element_children(div);

    assert_eq!(doc.tree().parent(div), Some(body));
    assert_eq!(doc.query_selector_all("p.x"), [paragraphs[0]]);
    assert_eq!(doc.query_selector_all("div > p"), paragraphs);
    assert_eq!(doc.query_selector_all("p ~ p"), [paragraphs[1]]);
}

#[test]
fn test_hyphenated_attribute_value() {
    let doc = body_with(vec![ParsedNode::element(
        "span",
        &[("data-x", "foo-bar")],
        vec![],
    )]);
    let span = doc.query_selector("span").unwrap();

    for selector in [
        r#"[data-x^="foo"]"#,
        r#"[data-x$="bar"]"#,
        r#"[data-x*="o-b"]"#,
        r#"[data-x|="foo"]"#,
    ] {
        assert_eq!(doc.query_selector_all(selector), [span], "{selector}");
        assert!(doc.element_matches(span, selector), "{selector}");
    }
    assert!(doc.query_selector_all(r#"[data-x~="foo-bar"]"#).is_empty());
    assert!(!doc.element_matches(span, r#"[data-x~="foo-bar"]"#));
}

// ========== Parsing ==========

#[test]
fn test_parse_list_shape() {
    let list = parse_selector_list("ul.nav > li a, #main").unwrap();
    assert_eq!(list.selectors.len(), 2);
    let first = &list.selectors[0];
    assert_eq!(
        first.subject.simple_selectors,
        vec![SimpleSelector::Type("a".to_string())]
    );
    let kinds: Vec<_> = first.combinators.iter().map(|(c, _)| *c).collect();
    assert_eq!(kinds, vec![Combinator::Descendant, Combinator::Child]);
    assert_eq!(
        list.selectors[1].subject.simple_selectors,
        vec![SimpleSelector::Id("main".to_string())]
    );
}

#[test]
fn test_parse_rejects_malformed() {
    assert_eq!(parse_selector_list(""), Err(SelectorParseError::Empty));
    assert!(parse_selector_list("div >").is_err());
    assert!(parse_selector_list("a,,b").is_err());
    assert!(parse_selector_list("ul.nav[").is_err());
    assert!(parse_selector_list("#").is_err());
}

// ========== Fast path ==========

#[test]
fn test_fast_path_queries() {
    let doc = fixture();
    assert_eq!(doc.query_selector("#greeting"), Some(by_id(&doc, "greeting")));
    assert_eq!(doc.query_selector_all(".item").len(), 3);
    assert_eq!(doc.query_selector_all("LI").len(), 3);
    assert_eq!(doc.query_selector_all(" p ").len(), 2);
    assert!(doc.query_selector("#missing").is_none());
    assert_eq!(
        doc.query_selector_all("*").len(),
        doc.get_elements_by_tag_name("*").len()
    );
    assert!(doc.get_errors().is_empty());
}

#[test]
fn test_scoped_queries() {
    let doc = fixture();
    let list = doc.query_selector("ul").unwrap();
    assert_eq!(doc.query_selector_all_from(list, "li").len(), 3);
    assert!(doc.query_selector_all_from(list, "ul").is_empty());
    assert!(doc.query_selector_from(list, "#greeting").is_none());
    assert_eq!(
        doc.query_selector_from(list, "#last"),
        Some(by_id(&doc, "last"))
    );
    assert_eq!(doc.query_selector_all_from(list, "li > a").len(), 2);
}

// ========== Combinators ==========

#[test]
fn test_combinators() {
    let doc = fixture();
    assert_eq!(doc.query_selector_all("#main li a").len(), 2);
    assert_eq!(ids(&doc, "ul > li"), ["first", "", "last"]);
    assert!(doc.query_selector_all("div > li").is_empty());
    assert_eq!(ids(&doc, "li.active + li"), [""]);
    assert_eq!(ids(&doc, "li ~ li"), ["", "last"]);
    assert_eq!(ids(&doc, "ul + p"), ["greeting"]);
    assert_eq!(ids(&doc, "ul ~ p"), ["greeting", "blank"]);
    assert!(doc.query_selector_all("p + ul").is_empty());
}

#[test]
fn test_descendant_backtracks() {
    let doc = fixture();
    // The nearest div ancestor of the span is .inner, whose parent is not
    // .outer; only .mid satisfies the child step.
    assert_eq!(ids(&doc, ".outer > div span"), ["deep"]);
    assert_eq!(ids(&doc, ".outer > .mid > .inner > span"), ["deep"]);
    assert!(doc.query_selector_all(".outer > .inner span").is_empty());
}

#[test]
fn test_selector_list_in_document_order() {
    let doc = fixture();
    let found = doc.query_selector_all("p, a");
    let tags: Vec<_> = found
        .iter()
        .map(|&n| doc.tree().as_element(n).unwrap().tag_name())
        .collect();
    assert_eq!(tags, ["a", "a", "p", "p"]);
    assert_eq!(ids(&doc, "#blank, #first, #blank"), ["first", "blank"]);
}

// ========== Attributes ==========

#[test]
fn test_attribute_operators() {
    let doc = fixture();
    let anchors = doc.query_selector_all("a");
    assert_eq!(anchors.len(), 2);

    assert_eq!(doc.query_selector_all("a[href]"), anchors);
    assert_eq!(doc.query_selector_all("[href^=https]"), [anchors[1]]);
    assert_eq!(doc.query_selector_all(r#"[href$=".pdf"]"#), [anchors[1]]);
    assert_eq!(doc.query_selector_all("[href*='x.org']"), [anchors[1]]);
    assert_eq!(doc.query_selector_all("[href='/home']"), [anchors[0]]);
    assert_eq!(ids(&doc, "[lang|=en]"), ["greeting"]);
    assert_eq!(ids(&doc, "[LANG=en-US]"), ["greeting"]);
    assert_eq!(ids(&doc, "[data-x~=baz]"), ["greeting"]);
    assert_eq!(ids(&doc, r#"[data-x="foo-bar baz"]"#), ["greeting"]);
    assert!(doc.get_errors().is_empty());
}

#[test]
fn test_includes_hyphenated_word_needs_a_word_list() {
    let doc = fixture();
    assert_eq!(ids(&doc, r#"[data-x~="foo-bar"]"#), ["greeting"]);
    assert!(doc.query_selector_all("[data-x~=foo]").is_empty());
    assert!(doc.query_selector_all("[data-x~='foo-bar baz']").is_empty());
    assert!(doc.get_errors().is_empty());
}

#[test]
fn test_includes_hyphenated_class() {
    let doc = body_with(vec![
        ParsedNode::element("li", &[("class", "nav-item active")], vec![]),
        ParsedNode::element("li", &[("class", "nav-item")], vec![]),
        ParsedNode::element("li", &[("class", "nav")], vec![]),
    ]);
    let items = doc.query_selector_all("li");
    assert_eq!(doc.query_selector_all("[class~=nav-item]"), [items[0]]);
    assert_eq!(doc.query_selector_all(".nav-item"), [items[0], items[1]]);
    assert_eq!(doc.query_selector_all("[class~=nav]"), [items[2]]);
}

#[test]
fn test_not_equals_parses_as_equals() {
    let doc = fixture();
    assert!(doc.query_selector_all("[lang!=en]").is_empty());
    assert_eq!(ids(&doc, "[lang!=en-US]"), ["greeting"]);
    assert!(doc.get_errors().is_empty());
}

// ========== Pseudo-classes ==========

#[test]
fn test_structural_pseudo_classes() {
    let doc = fixture();
    let html = doc.document_element().unwrap();
    assert_eq!(doc.query_selector_all(":root"), [html]);
    assert_eq!(ids(&doc, "li:first-child"), ["first"]);
    assert_eq!(ids(&doc, "li:last-child"), ["last"]);
    assert_eq!(doc.query_selector_all("a:only-child").len(), 2);
    assert_eq!(ids(&doc, "p:empty"), ["blank"]);
    assert_eq!(ids(&doc, "li:not(.hidden)"), ["first", ""]);
    assert_eq!(ids(&doc, "li:not(.hidden, .active)"), [""]);
    assert_eq!(ids(&doc, "p:not(:empty)"), ["greeting"]);
}

#[test]
fn test_unsupported_pseudo_class_matches_nothing() {
    let doc = fixture();
    assert!(doc.query_selector_all("a:hover").is_empty());
    assert!(doc.query_selector_all("li:nth-child(2)").is_empty());
    assert!(doc.query_selector_all("p::before").is_empty());
    assert_eq!(doc.query_selector_all("li:not(:hover)").len(), 3);
    assert!(doc.get_errors().is_empty());
}

// ========== Error handling ==========

#[test]
fn test_malformed_selector_logged_once() {
    let doc = fixture();
    let greeting = by_id(&doc, "greeting");

    assert!(doc.query_selector_all("div >").is_empty());
    assert!(doc.query_selector("div >").is_none());
    assert!(!doc.element_matches(greeting, "div >"));
    let errors = doc.get_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Invalid selector 'div >'"));

    assert!(doc.query_selector_all("p[").is_empty());
    assert_eq!(doc.get_errors().len(), 2);
}

// ========== matches / closest ==========

#[test]
fn test_element_matches() {
    let doc = fixture();
    let greeting = by_id(&doc, "greeting");
    assert!(doc.element_matches(greeting, "p"));
    assert!(doc.element_matches(greeting, "#main > p[lang]"));
    assert!(doc.element_matches(greeting, "li, p"));
    assert!(!doc.element_matches(greeting, ".empty"));

    let text = doc.tree().first_child(greeting).unwrap();
    assert!(!doc.element_matches(text, "p"));
    assert!(!doc.element_matches(text, "*"));
}

#[test]
fn test_closest() {
    let doc = fixture();
    let anchor = doc.query_selector("a").unwrap();
    let list = doc.query_selector("ul").unwrap();
    assert_eq!(doc.closest(anchor, "ul"), Some(list));
    assert_eq!(doc.closest(anchor, "a"), Some(anchor));
    assert_eq!(doc.closest(anchor, "div.container > *"), Some(list));
    assert_eq!(doc.closest(anchor, "li.active"), Some(by_id(&doc, "first")));
    assert!(doc.closest(anchor, ".outer").is_none());

    let text = doc.tree().first_child(anchor).unwrap();
    assert_eq!(doc.closest(text, "li"), Some(by_id(&doc, "first")));
}

#[test]
fn test_queries_see_mutations() {
    let mut doc = fixture();
    let blank = by_id(&doc, "blank");
    doc.tree_mut().set_attribute(blank, "class", "filled").unwrap();
    assert!(doc.query_selector_all(".empty").is_empty());
    assert_eq!(ids(&doc, "p.filled"), ["blank"]);

    let span = doc.create_element("span", None);
    let _ = doc.tree_mut().append_child(blank, span).unwrap();
    assert!(doc.query_selector_all("p:empty").is_empty());
    assert_eq!(doc.query_selector_all("#blank > span"), [span]);
}
