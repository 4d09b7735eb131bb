//! Inline style declarations and a simple computed style.
//!
//! There is no stylesheet cascade here. The computed style of an element is
//! its tag's default declarations, overridden by inherited properties from
//! the parent's computed style, overridden by the element's inline style.

use std::collections::BTreeMap;

use crate::error::DomResult;
use crate::node::NodeId;
use crate::tree::DomTree;

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Properties copied from the parent's computed style.
pub const INHERITED_PROPERTIES: [&str; 13] = [
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-indent",
    "word-spacing",
    "white-space",
    "direction",
    "visibility",
];

/// Resolved property values keyed by kebab-case property name.
pub type ComputedStyle = BTreeMap<String, String>;

/// Declarations of an inline `style` attribute, in source order.
///
/// Property names are lower-cased and both names and values are trimmed. A
/// repeated property keeps its first position and its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    declarations: Vec<(String, String)>,
}

impl StyleMap {
    /// Parse `prop: value; prop: value` text. Declarations without a colon
    /// or with an empty name or value are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut map = Self::default();
        for declaration in text.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if !property.is_empty() && !value.is_empty() {
                map.set(&property.to_ascii_lowercase(), value);
            }
        }
        map
    }

    /// Value of a property.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property, keeping its position if already present.
    pub fn set(&mut self, property: &str, value: &str) {
        let value = value.trim().to_string();
        match self
            .declarations
            .iter_mut()
            .find(|(name, _)| name == property)
        {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((property.to_string(), value)),
        }
    }

    /// Remove a property.
    pub fn remove(&mut self, property: &str) {
        self.declarations.retain(|(name, _)| name != property);
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether there are no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// `(property, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Serialize back to attribute text: `a: 1; b: 2`.
    #[must_use]
    pub fn to_css_text(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// `backgroundColor` to `background-color`. Kebab-case input is returned
/// unchanged.
pub(crate) fn to_kebab_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Default declarations for a tag.
fn tag_default_style(tag: &str) -> Vec<(&'static str, &'static str)> {
    let mut defaults = Vec::new();
    match tag {
        "div" | "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol" | "form"
        | "section" | "article" | "header" | "footer" | "nav" | "main" | "aside"
        | "blockquote" | "pre" => defaults.push(("display", "block")),
        "span" | "a" | "strong" | "b" | "em" | "i" | "u" | "s" | "strike" | "del" | "code" => {
            defaults.push(("display", "inline"));
        }
        "head" | "script" | "style" | "title" | "meta" | "link" => {
            defaults.push(("display", "none"));
        }
        "li" => defaults.push(("display", "list-item")),
        "table" => defaults.push(("display", "table")),
        "tr" => defaults.push(("display", "table-row")),
        "td" | "th" => defaults.push(("display", "table-cell")),
        _ => {}
    }
    match tag {
        "strong" | "b" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => {
            defaults.push(("font-weight", "bold"));
        }
        "em" | "i" => defaults.push(("font-style", "italic")),
        "u" => defaults.push(("text-decoration", "underline")),
        "s" | "strike" | "del" => defaults.push(("text-decoration", "line-through")),
        _ => {}
    }
    defaults
}

impl DomTree {
    /// The computed style of an element: tag defaults, then inherited
    /// properties from the parent element, then the inline style.
    ///
    /// # Errors
    ///
    /// [`DomError::WrongNodeType`](crate::DomError::WrongNodeType) if `id` is
    /// not an element, [`DomError::UnknownNode`](crate::DomError::UnknownNode)
    /// for foreign handles.
    pub fn computed_style(&self, id: NodeId) -> DomResult<ComputedStyle> {
        let _ = self.element(id)?;
        let mut chain = vec![id];
        chain.extend(
            self.ancestors(id)
                .take_while(|&ancestor| self.as_element(ancestor).is_some()),
        );

        // Outermost element first, each one inheriting from the last.
        let mut computed = ComputedStyle::new();
        for node in chain.into_iter().rev() {
            let element = self.element(node)?;
            let mut own: ComputedStyle = tag_default_style(element.tag_name())
                .into_iter()
                .map(|(property, value)| (property.to_string(), value.to_string()))
                .collect();
            for property in INHERITED_PROPERTIES {
                if let Some(value) = computed.get(property) {
                    let _ = own.insert(property.to_string(), value.clone());
                }
            }
            for (property, value) in element.style().iter() {
                let _ = own.insert(property.to_string(), value.to_string());
            }
            computed = own;
        }
        Ok(computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_style() {
        let style = StyleMap::parse("color: red; Font-Size : 12px;; bogus; width:");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("font-size"), Some("12px"));
        assert_eq!(style.get("width"), None);
    }

    #[test]
    fn test_set_keeps_position() {
        let mut style = StyleMap::parse("color: red; margin: 0");
        style.set("color", "blue");
        style.set("padding", "1px");
        assert_eq!(style.to_css_text(), "color: blue; margin: 0; padding: 1px");
        style.remove("margin");
        assert_eq!(style.to_css_text(), "color: blue; padding: 1px");
    }

    #[test]
    fn test_value_with_colon() {
        let style = StyleMap::parse("background: url(http://x/y.png)");
        assert_eq!(style.get("background"), Some("url(http://x/y.png)"));
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("backgroundColor"), "background-color");
        assert_eq!(to_kebab_case("borderTopWidth"), "border-top-width");
        assert_eq!(to_kebab_case("font-size"), "font-size");
    }

    #[test]
    fn test_tag_defaults() {
        assert_eq!(
            tag_default_style("h1"),
            vec![("display", "block"), ("font-weight", "bold")]
        );
        assert_eq!(tag_default_style("th"), vec![
            ("display", "table-cell"),
            ("font-weight", "bold")
        ]);
        assert_eq!(tag_default_style("del"), vec![
            ("display", "inline"),
            ("text-decoration", "line-through")
        ]);
        assert!(tag_default_style("custom-tag").is_empty());
    }
}
