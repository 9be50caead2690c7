//! Parse error types.

use source_map::Span;
use thiserror::Error;

/// An error that occurred during parsing.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `{` without a matching `}`.
    #[error("Unclosed block")]
    UnclosedBlock,

    /// A `/*` without a matching `*/`.
    #[error("Unclosed comment")]
    UnclosedComment,

    /// A string that reaches a line break or the end of input.
    #[error("Unclosed string")]
    UnclosedString,

    /// A `}` with no open block.
    #[error("Unexpected }}")]
    UnexpectedCloseBrace,

    /// Text that is neither a rule, an at-rule nor a declaration.
    #[error("Unknown word {word}")]
    UnknownWord {
        /// The offending text.
        word: String,
    },
}
