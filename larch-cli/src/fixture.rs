//! JSON parse fixtures.
//!
//! The DOM core does no tokenizing of its own, so the CLI feeds it parse
//! results stored as JSON: a serialized `ParsedDocument` for whole pages and
//! an array of `ParsedNode` for fragments.

use larch_dom::{HtmlParser, ParseError, ParsedDocument, ParsedNode};

/// An [`HtmlParser`] whose input is a JSON-serialized parse result.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFixtureParser;

impl HtmlParser for JsonFixtureParser {
    fn parse_document(&self, html: &str) -> Result<ParsedDocument, ParseError> {
        serde_json::from_str(html).map_err(|e| ParseError::Malformed(e.to_string()))
    }

    fn parse_fragment(&self, html: &str) -> Result<Vec<ParsedNode>, ParseError> {
        serde_json::from_str(html).map_err(|e| ParseError::Malformed(e.to_string()))
    }
}
