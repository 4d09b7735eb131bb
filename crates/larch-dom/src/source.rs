//! The tree handed over by an external HTML parser.
//!
//! Tokenization and tree construction live outside this crate. A parser
//! implements [`HtmlParser`] and produces [`ParsedDocument`] /
//! [`ParsedNode`] values, which the document converts into arena nodes.
//! Both types are serde-(de)serializable so parse results can be stored as
//! JSON fixtures:
//!
//! ```json
//! {
//!   "doctype": "html",
//!   "root": {
//!     "type": "element", "tag": "html",
//!     "attributes": [["lang", "en"]],
//!     "children": [{ "type": "text", "data": "hi" }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One node of an externally parsed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParsedNode {
    /// An element with ordered attributes and children.
    Element {
        /// Tag name as the parser saw it.
        tag: String,
        /// `(name, value)` pairs in source order.
        #[serde(default)]
        attributes: Vec<(String, String)>,
        /// Child nodes in order.
        #[serde(default)]
        children: Vec<ParsedNode>,
    },
    /// Character data.
    Text {
        /// The text.
        data: String,
    },
    /// A comment.
    Comment {
        /// The comment body, without `<!--` and `-->`.
        data: String,
    },
}

impl ParsedNode {
    /// An element node.
    #[must_use]
    pub fn element(
        tag: impl Into<String>,
        attributes: &[(&str, &str)],
        children: Vec<Self>,
    ) -> Self {
        Self::Element {
            tag: tag.into(),
            attributes: attributes
                .iter()
                .map(|&(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children,
        }
    }

    /// A text node.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text { data: data.into() }
    }

    /// A comment node.
    #[must_use]
    pub fn comment(data: impl Into<String>) -> Self {
        Self::Comment { data: data.into() }
    }
}

/// A whole parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// The doctype name, if the source had one.
    #[serde(default)]
    pub doctype: Option<String>,
    /// The root element, normally `<html>`.
    #[serde(default)]
    pub root: Option<ParsedNode>,
}

/// Failures reported by an [`HtmlParser`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input could not be turned into a tree.
    #[error("malformed markup: {0}")]
    Malformed(String),

    /// No parser is configured on the document.
    #[error("no HTML parser is configured")]
    NoParser,
}

/// The external HTML parser collaborator.
pub trait HtmlParser {
    /// Parse a complete document.
    ///
    /// # Errors
    ///
    /// [`ParseError`] when the input cannot be parsed.
    fn parse_document(&self, html: &str) -> Result<ParsedDocument, ParseError>;

    /// Parse a fragment, as for `innerHTML`.
    ///
    /// # Errors
    ///
    /// [`ParseError`] when the input cannot be parsed.
    fn parse_fragment(&self, html: &str) -> Result<Vec<ParsedNode>, ParseError>;
}
