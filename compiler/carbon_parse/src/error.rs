//! Parse errors.

use thiserror::Error;

use crate::Span;

/// A syntax error with the byte range it points at.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// The input ended before the construct did; more input could fix it.
    pub incomplete: bool,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
            incomplete: false,
        }
    }

    pub fn incomplete(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
            incomplete: true,
        }
    }
}
