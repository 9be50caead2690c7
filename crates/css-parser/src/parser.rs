//! Recursive descent parser for the CSS rule tree.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::ParseResult;
use smol_str::SmolStr;
use source_map::Span;

/// The CSS parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// The token stream, including trivia.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Parse errors collected during parsing.
    errors: Vec<ParseError>,
    /// EOF token for when we're past the end
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::from_range(source.len()..source.len()),
        };
        Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            eof_token,
        }
    }

    /// Parses the source into a stylesheet.
    pub fn parse(mut self) -> ParseResult {
        let nodes = self.parse_nodes(true);
        ParseResult {
            stylesheet: Stylesheet {
                nodes,
                span: Span::from_range(0..self.source.len()),
            },
            errors: self.errors,
        }
    }

    // === Token helpers ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError::new(kind, span));
    }

    fn skip_whitespace(&mut self) {
        while self.check(TokenKind::Whitespace) {
            self.advance();
        }
    }

    /// Records the error carried by an [`TokenKind::Error`] token.
    fn lex_error(&mut self, token: &Token) {
        let kind = if token.span.slice(self.source).starts_with('/') {
            ParseErrorKind::UnclosedComment
        } else {
            ParseErrorKind::UnclosedString
        };
        self.error(kind, token.span);
    }

    // === Grammar ===

    /// Parses nodes until the end of the enclosing block (or input).
    fn parse_nodes(&mut self, top_level: bool) -> Vec<Node> {
        let mut nodes = Vec::new();

        loop {
            self.skip_whitespace();
            let token = self.current().clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::RBrace if !top_level => break,
                TokenKind::RBrace => {
                    self.error(ParseErrorKind::UnexpectedCloseBrace, token.span);
                    self.advance();
                }
                TokenKind::Semicolon => self.advance(),
                TokenKind::Error => {
                    self.lex_error(&token);
                    self.advance();
                }
                TokenKind::Comment => {
                    nodes.push(Node::Comment(Comment {
                        text: token.span.slice(self.source).to_string(),
                        span: token.span,
                    }));
                    self.advance();
                }
                TokenKind::AtKeyword => nodes.push(self.parse_at_rule()),
                _ => {
                    if let Some(node) = self.parse_rule_or_declaration(top_level) {
                        nodes.push(node);
                    }
                }
            }
        }

        nodes
    }

    /// Consumes tokens up to (not including) the next `{`, `}` or top-level `;`.
    ///
    /// Returns the span from the first to the last non-trivia token, or `None`
    /// if there was nothing but trivia.
    fn parse_prelude(&mut self) -> Option<Span> {
        let mut depth = 0u32;
        let mut first: Option<Span> = None;
        let mut last: Option<Span> = None;

        loop {
            let token = self.current().clone();
            match token.kind {
                TokenKind::Eof | TokenKind::LBrace | TokenKind::RBrace => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::Error => self.lex_error(&token),
                _ => {}
            }

            if !token.kind.is_trivia() {
                first.get_or_insert(token.span);
                last = Some(token.span);
            }
            self.advance();
        }

        Some(first?.to(last?))
    }

    /// Consumes the `}` closing a block opened at `start`.
    fn expect_block_end(&mut self, start: Span) -> Span {
        let token = self.current().clone();
        if token.kind == TokenKind::RBrace {
            self.advance();
        } else {
            self.error(ParseErrorKind::UnclosedBlock, start);
        }
        token.span
    }

    fn parse_rule_or_declaration(&mut self, top_level: bool) -> Option<Node> {
        let prelude = self.parse_prelude();

        if self.check(TokenKind::LBrace) {
            let open = self.current().span;
            self.advance();
            let selector_span = prelude.unwrap_or(Span::empty(open.start));
            let nodes = self.parse_nodes(false);
            let close = self.expect_block_end(selector_span);

            return Some(Node::Rule(Rule {
                selector: SmolStr::new(selector_span.slice(self.source)),
                selector_span,
                span: selector_span.to(close),
                nodes,
            }));
        }

        // Terminated by `;`, `}` or end of input. The caller consumes the terminator.
        let prelude = prelude?;
        let text = prelude.slice(self.source);
        match text.split_once(':') {
            Some((property, value)) if !top_level => Some(Node::Declaration(Declaration {
                property: SmolStr::new(property.trim()),
                value: value.trim().to_string(),
                span: prelude,
            })),
            _ => {
                let word = text.split_whitespace().next().unwrap_or(text).to_string();
                self.error(ParseErrorKind::UnknownWord { word }, prelude);
                None
            }
        }
    }

    fn parse_at_rule(&mut self) -> Node {
        let keyword = self.current().span;
        let name = SmolStr::new(keyword.slice(self.source).trim_start_matches('@'));
        self.advance();

        let params = self.parse_prelude();
        let params_span = params.unwrap_or(Span::empty(keyword.end));
        let params_text = params
            .map(|span| span.slice(self.source).to_string())
            .unwrap_or_default();

        let (span, nodes) = match self.current_kind() {
            TokenKind::LBrace => {
                self.advance();
                let nodes = self.parse_nodes(false);
                let close = self.expect_block_end(keyword);
                (keyword.to(close), Some(nodes))
            }
            TokenKind::Semicolon => {
                let end = self.current().span;
                self.advance();
                (keyword.to(end), None)
            }
            _ => (keyword.to(params_span), None),
        };

        Node::AtRule(AtRule {
            name,
            params: params_text,
            params_span,
            span,
            nodes,
        })
    }
}
