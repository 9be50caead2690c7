//! Rule-level CSS parser for typed-less-modules-rs.
//!
//! The parser understands just enough CSS to recover the rule tree of a
//! stylesheet: rules with their selector text, at-rules with their params,
//! declarations and comments, each with a byte span. Selectors and values are
//! kept as raw text.
//!
//! - Lexer (tokenizer) using `logos`
//! - Recursive descent parser
//! - Error recovery: the tree is always returned together with any errors
//!
//! # Example
//!
//! ```
//! use css_parser::parse;
//!
//! let result = parse(".button { color: red; }\n@media print { .button { color: black; } }");
//! assert!(result.errors.is_empty());
//!
//! let selectors: Vec<&str> = result
//!     .stylesheet
//!     .rules()
//!     .map(|rule| rule.selector.as_str())
//!     .collect();
//! assert_eq!(selectors, [".button", ".button"]);
//! ```

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Syntax, Token, TokenKind};
pub use source_map::Span;

/// The result of parsing a stylesheet.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed stylesheet.
    pub stylesheet: Stylesheet,
    /// Errors encountered during parsing, in source order.
    pub errors: Vec<ParseError>,
}

/// Parses CSS source into a rule tree.
pub fn parse(source: &str) -> ParseResult {
    parser::Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.stylesheet.nodes.is_empty());
    }

    #[test]
    fn test_parse_single_rule() {
        let result = parse(".someClass { color: red; }");
        assert!(result.errors.is_empty());
        assert_eq!(result.stylesheet.nodes.len(), 1);
    }

    #[test]
    fn test_parse_reports_unclosed_block() {
        let result = parse(".a { color: red;");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.stylesheet.rules().count(), 1);
    }
}
