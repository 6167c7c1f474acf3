//! Recursive descent over the token stream, emitting postfix instructions.
//!
//! Nothing is built: each construct writes its children's instructions and
//! then its own marker, in the order the tree builder consumes them. Only
//! statements of a program or block body are followed by `END_STATEMENT`;
//! the statement that forms the branch of an `if` or the body of a loop is
//! a single child node.
//!
//! # Submodules
//!
//! - `expr`: the expression precedence ladder and literals

mod expr;

use carbon_ir::{InstructionBuffer, InstructionKind, InstructionWriter};

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

/// Whether an expression may stand on the left of `=`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Operand {
    /// An identifier or member access.
    Place,
    Value,
}

pub struct Parser<'src> {
    cursor: Cursor<'src>,
    out: InstructionBuffer,
    /// Block nesting; the final top-level statement may omit its `;`.
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(source, tokens),
            out: InstructionBuffer::new(),
            depth: 0,
        }
    }

    pub fn finish(self) -> InstructionBuffer {
        self.out
    }

    #[inline]
    fn emit(&mut self, kind: InstructionKind) {
        self.out.write_instruction(kind);
    }

    #[inline]
    fn emit_atom(&mut self, kind: InstructionKind, text: &str) {
        self.out.write_atom(kind, text);
    }

    pub fn parse_program(&mut self) -> Result<(), ParseError> {
        while !self.cursor.is_at_end() {
            self.listed_statement()?;
        }
        Ok(())
    }

    /// A statement of a program or block body.
    fn listed_statement(&mut self) -> Result<(), ParseError> {
        if self.cursor.eat(TokenKind::Semicolon) {
            return Ok(());
        }
        self.statement()?;
        self.emit(InstructionKind::EndStatement);
        Ok(())
    }

    /// One statement as a single node.
    fn statement(&mut self) -> Result<(), ParseError> {
        match self.cursor.peek() {
            Some(TokenKind::LBrace) => self.block(),
            Some(TokenKind::If) => self.if_statement(),
            Some(TokenKind::While) => self.while_statement(),
            Some(TokenKind::For) => self.for_statement(),
            Some(TokenKind::Return) => {
                self.cursor.advance();
                if self.at_statement_end() {
                    self.end_simple_statement()?;
                    self.emit(InstructionKind::Return0);
                } else {
                    self.expression()?;
                    self.end_simple_statement()?;
                    self.emit(InstructionKind::Return1);
                }
                Ok(())
            }
            Some(TokenKind::Break) => {
                self.cursor.advance();
                self.end_simple_statement()?;
                self.emit(InstructionKind::Break);
                Ok(())
            }
            Some(TokenKind::Continue) => {
                self.cursor.advance();
                self.end_simple_statement()?;
                self.emit(InstructionKind::Continue);
                Ok(())
            }
            Some(TokenKind::Local) => self.local_statement(),
            Some(TokenKind::Function) if self.cursor.peek_next() == Some(TokenKind::Ident) => {
                self.function_statement()
            }
            Some(TokenKind::Semicolon) => {
                // an empty branch or loop body
                self.cursor.advance();
                self.emit(InstructionKind::BlockBegin);
                self.emit(InstructionKind::BlockEnd);
                Ok(())
            }
            _ => {
                self.simple_statement()?;
                self.end_simple_statement()
            }
        }
    }

    fn at_statement_end(&self) -> bool {
        self.cursor.check(TokenKind::Semicolon) || (self.cursor.is_at_end() && self.depth == 0)
    }

    fn end_simple_statement(&mut self) -> Result<(), ParseError> {
        if self.cursor.eat(TokenKind::Semicolon) || (self.cursor.is_at_end() && self.depth == 0) {
            Ok(())
        } else {
            Err(self.cursor.unexpected("`;`"))
        }
    }

    /// An expression, or an assignment to one. Used for expression
    /// statements and the clauses of `for`.
    fn simple_statement(&mut self) -> Result<(), ParseError> {
        let start = self.cursor.current_span().start;
        let target = self.expression()?;
        if self.cursor.check(TokenKind::Eq) {
            if target != Operand::Place {
                let end = self.cursor.current_span().start;
                return Err(ParseError::new("invalid assignment target", start..end));
            }
            self.cursor.advance();
            self.expression()?;
            self.emit(InstructionKind::Assign);
        }
        Ok(())
    }

    fn block(&mut self) -> Result<(), ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        self.emit(InstructionKind::BlockBegin);
        self.depth += 1;
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.unexpected("`}`"));
            }
            self.listed_statement()?;
        }
        self.depth -= 1;
        self.cursor.advance();
        self.emit(InstructionKind::BlockEnd);
        Ok(())
    }

    fn parenthesized(&mut self) -> Result<(), ParseError> {
        self.cursor.expect(TokenKind::LParen)?;
        self.expression()?;
        self.cursor.expect(TokenKind::RParen)?;
        Ok(())
    }

    /// `if (c) s` or `if (c) s else s`
    fn if_statement(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        self.parenthesized()?;
        self.statement()?;
        if self.cursor.eat(TokenKind::Else) {
            self.statement()?;
            self.emit(InstructionKind::IfElse);
        } else {
            self.emit(InstructionKind::If);
        }
        Ok(())
    }

    /// `while (c) s`, or `while (c);` with the work done by the condition.
    fn while_statement(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        self.parenthesized()?;
        if self.cursor.eat(TokenKind::Semicolon) {
            self.emit(InstructionKind::Loop0);
        } else {
            self.statement()?;
            self.emit(InstructionKind::Loop1);
        }
        Ok(())
    }

    /// `for (init; cond; step) s` with every clause optional. A missing
    /// condition is `true`; a missing step is an empty block unless the
    /// init is missing too, in which case the loop is `LOOP1`.
    fn for_statement(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen)?;

        let has_init = !self.cursor.check(TokenKind::Semicolon);
        if has_init {
            self.simple_statement()?;
        }
        self.cursor.expect(TokenKind::Semicolon)?;

        if self.cursor.check(TokenKind::Semicolon) {
            self.emit(InstructionKind::True);
        } else {
            self.expression()?;
        }
        self.cursor.expect(TokenKind::Semicolon)?;

        let has_step = !self.cursor.check(TokenKind::RParen);
        if has_step {
            self.simple_statement()?;
        } else if has_init {
            self.emit(InstructionKind::BlockBegin);
            self.emit(InstructionKind::BlockEnd);
        }
        self.cursor.expect(TokenKind::RParen)?;

        self.statement()?;
        self.emit(match (has_init, has_step) {
            (true, _) => InstructionKind::Loop3,
            (false, true) => InstructionKind::Loop2,
            (false, false) => InstructionKind::Loop1,
        });
        Ok(())
    }

    /// `local x;` or `local x = expr;`
    fn local_statement(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        let name = self.cursor.expect(TokenKind::Ident)?;
        self.emit_atom(InstructionKind::Id, name);
        self.emit(InstructionKind::Local);
        if self.cursor.eat(TokenKind::Eq) {
            self.expression()?;
            self.emit(InstructionKind::Assign);
        }
        self.end_simple_statement()
    }

    /// `function name(a, b) body`, the same as `name = function(a, b) body;`
    fn function_statement(&mut self) -> Result<(), ParseError> {
        self.cursor.advance();
        let name = self.cursor.expect(TokenKind::Ident)?;
        self.emit_atom(InstructionKind::Id, name);
        self.function_rest()?;
        self.emit(InstructionKind::Assign);
        self.cursor.eat(TokenKind::Semicolon);
        Ok(())
    }

    /// Parameter list and body of a function literal.
    fn function_rest(&mut self) -> Result<(), ParseError> {
        self.emit(InstructionKind::FunctionBegin);
        self.cursor.expect(TokenKind::LParen)?;
        if !self.cursor.eat(TokenKind::RParen) {
            loop {
                let param = self.cursor.expect(TokenKind::Ident)?;
                self.emit_atom(InstructionKind::Id, param);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(TokenKind::RParen)?;
        }
        self.statement()?;
        self.emit(InstructionKind::FunctionEnd);
        Ok(())
    }
}
