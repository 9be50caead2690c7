//! CSS lexer using logos.
//!
//! Only the characters that shape the rule tree get their own token kinds.
//! Everything else (selector and value text) is lexed as [`TokenKind::Text`]
//! and reassembled by the parser from spans.

use logos::Logos;
use source_map::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
pub enum TokenKind {
    /// Spaces, tabs and line breaks.
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// `/* ... */`
    #[token("/*", lex_comment)]
    Comment,

    /// A single- or double-quoted string.
    #[token("\"", |lex| lex_string(lex, b'"'))]
    #[token("'", |lex| lex_string(lex, b'\''))]
    String,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `:`
    #[token(":")]
    Colon,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `@media`, `@import`, ...
    #[regex(r"@[a-zA-Z_-][a-zA-Z0-9_-]*", priority = 5)]
    AtKeyword,

    /// A lone `@` (e.g. LESS interpolation).
    #[token("@")]
    At,

    /// `/` outside of a comment.
    #[token("/")]
    Slash,

    /// Any other run of characters.
    #[regex(r#"[^{};:()"'@/ \t\r\n\f]+"#, priority = 1)]
    Text,

    /// `// ...` up to the end of the line. Only produced in LESS mode.
    LineComment,

    /// End of file
    Eof,

    /// An unterminated comment or string.
    #[default]
    Error,
}

fn lex_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

fn lex_string(lex: &mut logos::Lexer<TokenKind>, quote: u8) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => {
                lex.bump(i);
                return false;
            }
            b if b == quote => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    lex.bump(bytes.len());
    false
}

impl TokenKind {
    /// Returns true for tokens that carry no meaning between other tokens.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::LineComment
        )
    }

    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::LineComment => "line comment",
            TokenKind::String => "string",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::At => "'@'",
            TokenKind::Slash => "'/'",
            TokenKind::Text => "text",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// The stylesheet dialect being lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    #[default]
    Css,
    /// CSS plus `//` line comments.
    Less,
}

impl Syntax {
    /// Picks the dialect from a file extension.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case("less") => Syntax::Less,
            _ => Syntax::Css,
        }
    }
}

/// A lexer for CSS source.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    syntax: Syntax,
    /// `//` inside parentheses is part of a value such as `url(http://...)`.
    paren_depth: u32,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self::with_syntax(source, Syntax::Css)
    }

    /// Creates a lexer for the given dialect.
    pub fn with_syntax(source: &'src str, syntax: Syntax) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            syntax,
            paren_depth: 0,
            finished: false,
        }
    }

    /// Returns the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(result) => {
                let mut kind = result.unwrap_or(TokenKind::Error);
                match kind {
                    TokenKind::LParen => self.paren_depth += 1,
                    TokenKind::RParen => self.paren_depth = self.paren_depth.saturating_sub(1),
                    TokenKind::Slash
                        if self.syntax == Syntax::Less
                            && self.paren_depth == 0
                            && self.inner.remainder().starts_with('/') =>
                    {
                        let rest = self.inner.remainder();
                        let len = rest.find('\n').unwrap_or(rest.len());
                        self.inner.bump(len);
                        kind = TokenKind::LineComment;
                    }
                    _ => {}
                }
                Some(Token {
                    kind,
                    span: Span::from_range(self.inner.span()),
                })
            }
            None => {
                self.finished = true;
                Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::from_range(self.source.len()..self.source.len()),
                })
            }
        }
    }
}
