//! Hand-written selector parser.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! A recursive-descent parser over the selector's characters. Offsets in
//! errors are byte offsets into the input.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorList,
    SimpleSelector,
};

/// How deeply `:not(...)` may nest.
const MAX_NESTING: usize = 32;

/// Why a selector string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    /// The selector is empty or only whitespace.
    #[error("empty selector")]
    Empty,

    /// A character that cannot appear at this point.
    #[error("unexpected {found:?} at offset {offset}")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Where it was found.
        offset: usize,
    },

    /// `.`, `#`, `:` or an attribute name without an identifier.
    #[error("expected an identifier at offset {offset}")]
    ExpectedIdentifier {
        /// Where the identifier should start.
        offset: usize,
    },

    /// A selector list alternative with no simple selectors, e.g. `a,,b`.
    #[error("empty compound selector at offset {offset}")]
    EmptyCompound {
        /// Where the compound should start.
        offset: usize,
    },

    /// A combinator with nothing on one side, e.g. `> p` or `div +`.
    #[error("combinator at offset {offset} is missing a selector")]
    DanglingCombinator {
        /// Where the combinator is.
        offset: usize,
    },

    /// `[` without a matching `]`.
    #[error("unclosed '[' at offset {offset}")]
    UnbalancedBracket {
        /// Where the `[` is.
        offset: usize,
    },

    /// `(` without a matching `)`.
    #[error("unclosed '(' at offset {offset}")]
    UnbalancedParenthesis {
        /// Where the `(` is.
        offset: usize,
    },

    /// A quoted attribute value without its closing quote.
    #[error("unterminated string at offset {offset}")]
    UnterminatedString {
        /// Where the opening quote is.
        offset: usize,
    },

    /// `:not(...)` nested too deeply.
    #[error("selector nesting is deeper than {max}")]
    TooDeep {
        /// The nesting limit.
        max: usize,
    },
}

type ParseResult<T> = Result<T, SelectorParseError>;

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Parse a comma-separated selector list.
///
/// # Errors
///
/// A [`SelectorParseError`] describing the first problem found.
///
/// # Example
/// ```
/// use larch_dom::selector::{parse_selector_list, Combinator};
///
/// let list = parse_selector_list("ul > li.item, p").unwrap();
/// assert_eq!(list.selectors.len(), 2);
/// assert_eq!(list.selectors[0].combinators[0].0, Combinator::Child);
/// assert!(parse_selector_list("div >").is_err());
/// ```
pub fn parse_selector_list(input: &str) -> ParseResult<SelectorList> {
    let mut parser = Parser {
        chars: input.char_indices().peekable(),
        len: input.len(),
        depth: 0,
    };
    let _ = parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(SelectorParseError::Empty);
    }

    let list = parser.parse_list()?;
    let offset = parser.offset();
    match parser.bump() {
        None => Ok(list),
        Some(found) => Err(SelectorParseError::UnexpectedCharacter { found, offset }),
    }
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.len, |&(offset, _)| offset)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = self.bump();
            skipped = true;
        }
        skipped
    }

    fn eat_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            ident.push(c);
            let _ = self.bump();
        }
        ident
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        let offset = self.offset();
        let ident = self.eat_ident();
        if ident.is_empty() {
            return Err(SelectorParseError::ExpectedIdentifier { offset });
        }
        Ok(ident)
    }

    /// Alternatives up to the end of input or an unmatched `)`.
    fn parse_list(&mut self) -> ParseResult<SelectorList> {
        let mut selectors = Vec::new();
        loop {
            let _ = self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            if self.peek() == Some(',') {
                let _ = self.bump();
            } else {
                return Ok(SelectorList { selectors });
            }
        }
    }

    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    //
    // Parsed left to right; each compound is pushed onto the chain together
    // with the combinator that links it to the compound on its right, and
    // the chain is reversed at the end so matching can start at the subject.
    fn parse_complex(&mut self) -> ParseResult<ComplexSelector> {
        let mut subject = self.parse_compound()?;
        let mut chain = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let offset = self.offset();
            let combinator = match self.peek() {
                None | Some(',' | ')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => {
                    return Err(SelectorParseError::UnexpectedCharacter { found, offset });
                }
            };
            if combinator != Combinator::Descendant {
                let _ = self.bump();
                let _ = self.skip_whitespace();
            }
            if matches!(self.peek(), None | Some(',' | ')' | '>' | '+' | '~')) {
                return Err(SelectorParseError::DanglingCombinator { offset });
            }

            let next = self.parse_compound()?;
            chain.push((combinator, std::mem::replace(&mut subject, next)));
        }

        chain.reverse();
        Ok(ComplexSelector {
            subject,
            combinators: chain,
        })
    }

    // [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    // "If it contains a type selector or universal selector, that selector
    // must come first in the sequence."
    fn parse_compound(&mut self) -> ParseResult<CompoundSelector> {
        let mut simple_selectors = Vec::new();
        loop {
            let offset = self.offset();
            let simple = match self.peek() {
                Some('*') if simple_selectors.is_empty() => {
                    let _ = self.bump();
                    SimpleSelector::Universal
                }
                Some(c) if simple_selectors.is_empty() && (is_ident_start_char(c) || c == '-') => {
                    SimpleSelector::Type(self.eat_ident().to_ascii_lowercase())
                }
                Some('.') => {
                    let _ = self.bump();
                    SimpleSelector::Class(self.expect_ident()?)
                }
                Some('#') => {
                    let _ = self.bump();
                    SimpleSelector::Id(self.expect_ident()?)
                }
                Some('[') => {
                    let _ = self.bump();
                    SimpleSelector::Attribute(self.parse_attribute(offset)?)
                }
                Some(':') => {
                    let _ = self.bump();
                    self.parse_pseudo()?
                }
                _ => break,
            };
            simple_selectors.push(simple);
        }

        if simple_selectors.is_empty() {
            let offset = self.offset();
            return Err(match self.peek() {
                Some('>' | '+' | '~') => SelectorParseError::DanglingCombinator { offset },
                None | Some(',' | ')') => SelectorParseError::EmptyCompound { offset },
                Some(found) => SelectorParseError::UnexpectedCharacter { found, offset },
            });
        }
        Ok(CompoundSelector { simple_selectors })
    }

    // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute(&mut self, open: usize) -> ParseResult<AttributeSelector> {
        let _ = self.skip_whitespace();
        if self.peek().is_none() {
            return Err(SelectorParseError::UnbalancedBracket { offset: open });
        }
        let name = self.expect_ident()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        let offset = self.offset();
        let operator = match self.bump() {
            Some(']') => return Ok(AttributeSelector::Exists(name)),
            Some('=') => '=',
            Some(c @ ('~' | '|' | '^' | '$' | '*' | '!')) if self.peek() == Some('=') => {
                let _ = self.bump();
                c
            }
            Some(found) => {
                return Err(SelectorParseError::UnexpectedCharacter { found, offset });
            }
            None => return Err(SelectorParseError::UnbalancedBracket { offset: open }),
        };

        let _ = self.skip_whitespace();
        let value = self.parse_attr_value(open)?;
        let _ = self.skip_whitespace();
        let offset = self.offset();
        match self.bump() {
            Some(']') => {}
            Some(found) => {
                return Err(SelectorParseError::UnexpectedCharacter { found, offset });
            }
            None => return Err(SelectorParseError::UnbalancedBracket { offset: open }),
        }

        Ok(match operator {
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            '*' => AttributeSelector::SubstringMatch(name, value),
            // `=` and anything unrecognised compare exactly.
            _ => AttributeSelector::Equals(name, value),
        })
    }

    /// Parse an attribute value inside `[attr=value]`.
    /// Handles both quoted (`"val"`, `'val'`) and unquoted ident values.
    fn parse_attr_value(&mut self, open: usize) -> ParseResult<String> {
        let offset = self.offset();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let _ = self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some('\\') => match self.bump() {
                            Some(escaped) => value.push(escaped),
                            None => return Err(SelectorParseError::UnterminatedString { offset }),
                        },
                        Some(c) if c == quote => return Ok(value),
                        Some(c) => value.push(c),
                        None => return Err(SelectorParseError::UnterminatedString { offset }),
                    }
                }
            }
            Some(c) if is_ident_char(c) || c == '.' => {
                let mut value = String::new();
                while let Some(c) = self.peek().filter(|&c| is_ident_char(c) || c == '.') {
                    value.push(c);
                    let _ = self.bump();
                }
                Ok(value)
            }
            Some(']') => Err(SelectorParseError::ExpectedIdentifier { offset }),
            Some(found) => Err(SelectorParseError::UnexpectedCharacter { found, offset }),
            None => Err(SelectorParseError::UnbalancedBracket { offset: open }),
        }
    }

    // [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    // [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    fn parse_pseudo(&mut self) -> ParseResult<SimpleSelector> {
        let is_pseudo_element = self.peek() == Some(':');
        if is_pseudo_element {
            let _ = self.bump();
        }
        let name = self.expect_ident()?.to_ascii_lowercase();
        let prefix = if is_pseudo_element { "::" } else { ":" };

        if self.peek() == Some('(') {
            let open = self.offset();
            let _ = self.bump();
            if name == "not" && !is_pseudo_element {
                return self.parse_negation(open);
            }
            // Other functional pseudo-classes are skipped as a unit.
            self.skip_balanced(open)?;
            return Ok(SimpleSelector::PseudoClass(PseudoClass::Unsupported(
                format!("{prefix}{name}()"),
            )));
        }

        let pseudo = match (is_pseudo_element, name.as_str()) {
            (false, "root") => PseudoClass::Root,
            (false, "first-child") => PseudoClass::FirstChild,
            (false, "last-child") => PseudoClass::LastChild,
            (false, "only-child") => PseudoClass::OnlyChild,
            (false, "empty") => PseudoClass::Empty,
            _ => PseudoClass::Unsupported(format!("{prefix}{name}")),
        };
        Ok(SimpleSelector::PseudoClass(pseudo))
    }

    fn parse_negation(&mut self, open: usize) -> ParseResult<SimpleSelector> {
        if self.depth >= MAX_NESTING {
            return Err(SelectorParseError::TooDeep { max: MAX_NESTING });
        }
        self.depth += 1;
        let inner = self.parse_list()?;
        self.depth -= 1;

        let offset = self.offset();
        match self.bump() {
            Some(')') => Ok(SimpleSelector::Negation(inner)),
            Some(found) => Err(SelectorParseError::UnexpectedCharacter { found, offset }),
            None => Err(SelectorParseError::UnbalancedParenthesis { offset: open }),
        }
    }

    fn skip_balanced(&mut self, open: usize) -> ParseResult<()> {
        let mut depth = 1u32;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(SelectorParseError::UnbalancedParenthesis { offset: open })
    }
}
