//! Token cursor with one-token lookahead.

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::Span;

pub struct Cursor<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Cursor {
            source,
            tokens,
            pos: 0,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Kind of the current token; `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Kind of the token after the current one.
    pub fn peek_next(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| t.kind)
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    /// Span of the current token, or an empty span at the end of the source.
    pub fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(token) => token.span.clone(),
            None => self.source.len()..self.source.len(),
        }
    }

    /// Source text of the current token.
    pub fn current_text(&self) -> &'src str {
        match self.tokens.get(self.pos) {
            Some(token) => &self.source[token.span.clone()],
            None => "",
        }
    }

    /// Consume the current token, returning its text.
    pub fn advance(&mut self) -> &'src str {
        let text = self.current_text();
        if !self.is_at_end() {
            self.pos += 1;
        }
        text
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a `kind` token or fail with an "expected" error.
    pub fn expect(&mut self, kind: TokenKind) -> Result<&'src str, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// Error for the current token, which is not what `expected` describes.
    /// At end of input the error is marked incomplete.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        if self.is_at_end() {
            ParseError::incomplete(
                format!("expected {expected}, found end of input"),
                self.current_span(),
            )
        } else {
            ParseError::new(
                format!("expected {expected}, found `{}`", self.current_text()),
                self.current_span(),
            )
        }
    }
}
