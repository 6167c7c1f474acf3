//! Carbon Parse - the front end of the Carbon interpreter.
//!
//! Source text is tokenized with logos and parsed by recursive descent
//! straight into the postfix instruction stream of `carbon_ir`. No syntax
//! tree is built here; the tree builder in `carbon_eval` assembles one from
//! the stream.
//!
//! Parsing is all-or-nothing: a source fragment either yields a complete
//! [`InstructionBuffer`] or a [`ParseError`], so a syntax error never
//! leaves a half-written statement in the interpreter. Errors caused only by
//! running out of input are flagged `incomplete`, which the
//! REPL uses to ask for a continuation line.

mod cursor;
mod error;
mod grammar;
mod lexer;

use carbon_ir::InstructionBuffer;

pub use error::ParseError;
pub use lexer::{lex, Token, TokenKind};

/// Byte range in the source text.
pub type Span = std::ops::Range<usize>;

/// Parse a whole source fragment into instructions.
pub fn parse(source: &str) -> Result<InstructionBuffer, ParseError> {
    let tokens = lexer::lex(source)?;
    let mut parser = grammar::Parser::new(source, tokens);
    parser.parse_program()?;
    let buffer = parser.finish();
    tracing::trace!(instructions = buffer.len(), "parsed");
    Ok(buffer)
}

#[cfg(test)]
mod tests;
