//! Expressions, lowest precedence first:
//!
//! ```text
//! ||  &&  == !=  < > <= >=  + -  * / %  unary - + !  call/member  primary
//! ```

use carbon_ir::InstructionKind;

use super::{Operand, Parser};
use crate::error::ParseError;
use crate::lexer::TokenKind;

type Level<'src> = fn(&mut Parser<'src>) -> Result<Operand, ParseError>;

impl<'src> Parser<'src> {
    pub(super) fn expression(&mut self) -> Result<Operand, ParseError> {
        self.logical_or()
    }

    /// One left-associative binary level: operands from `next`, operators
    /// from `ops`.
    fn binary_level(
        &mut self,
        next: Level<'src>,
        ops: &[(TokenKind, InstructionKind)],
    ) -> Result<Operand, ParseError> {
        let mut operand = next(self)?;
        'outer: loop {
            for &(token, instruction) in ops {
                if self.cursor.eat(token) {
                    next(self)?;
                    self.emit(instruction);
                    operand = Operand::Value;
                    continue 'outer;
                }
            }
            return Ok(operand);
        }
    }

    fn logical_or(&mut self) -> Result<Operand, ParseError> {
        self.binary_level(Self::logical_and, &[(TokenKind::PipePipe, InstructionKind::Lor)])
    }

    fn logical_and(&mut self) -> Result<Operand, ParseError> {
        self.binary_level(Self::equality, &[(TokenKind::AmpAmp, InstructionKind::Land)])
    }

    fn equality(&mut self) -> Result<Operand, ParseError> {
        self.binary_level(
            Self::relational,
            &[
                (TokenKind::EqEq, InstructionKind::Eq),
                (TokenKind::NotEq, InstructionKind::Ne),
            ],
        )
    }

    fn relational(&mut self) -> Result<Operand, ParseError> {
        self.binary_level(
            Self::additive,
            &[
                (TokenKind::Lt, InstructionKind::Lt),
                (TokenKind::Gt, InstructionKind::Gt),
                (TokenKind::LtEq, InstructionKind::Le),
                (TokenKind::GtEq, InstructionKind::Ge),
            ],
        )
    }

    fn additive(&mut self) -> Result<Operand, ParseError> {
        self.binary_level(
            Self::multiplicative,
            &[
                (TokenKind::Plus, InstructionKind::Add),
                (TokenKind::Minus, InstructionKind::Sub),
            ],
        )
    }

    fn multiplicative(&mut self) -> Result<Operand, ParseError> {
        self.binary_level(
            Self::unary,
            &[
                (TokenKind::Star, InstructionKind::Mul),
                (TokenKind::Slash, InstructionKind::Div),
                (TokenKind::Percent, InstructionKind::Mod),
            ],
        )
    }

    fn unary(&mut self) -> Result<Operand, ParseError> {
        let op = match self.cursor.peek() {
            Some(TokenKind::Minus) => InstructionKind::Neg,
            Some(TokenKind::Plus) => InstructionKind::Pos,
            Some(TokenKind::Bang) => InstructionKind::Not,
            _ => return self.postfix(),
        };
        self.cursor.advance();
        self.unary()?;
        self.emit(op);
        Ok(Operand::Value)
    }

    /// Calls `f(a, b)` and member accesses `o.name`, any number of each.
    fn postfix(&mut self) -> Result<Operand, ParseError> {
        let mut operand = self.primary()?;
        loop {
            match self.cursor.peek() {
                Some(TokenKind::LParen) => {
                    self.cursor.advance();
                    self.emit(InstructionKind::CallBegin);
                    self.comma_list(TokenKind::RParen, |p| p.expression().map(drop))?;
                    self.emit(InstructionKind::CallEnd);
                    operand = Operand::Value;
                }
                Some(TokenKind::Dot) => {
                    self.cursor.advance();
                    let name = self.cursor.expect(TokenKind::Ident)?;
                    self.emit_atom(InstructionKind::Id, name);
                    self.emit(InstructionKind::Member);
                    operand = Operand::Place;
                }
                _ => return Ok(operand),
            }
        }
    }

    /// Items separated by commas up to and including `close`; a trailing
    /// comma is allowed.
    fn comma_list(
        &mut self,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<(), ParseError>,
    ) -> Result<(), ParseError> {
        while !self.cursor.eat(close) {
            item(self)?;
            if !self.cursor.eat(TokenKind::Comma) {
                self.cursor.expect(close)?;
                break;
            }
        }
        Ok(())
    }

    fn primary(&mut self) -> Result<Operand, ParseError> {
        let Some(kind) = self.cursor.peek() else {
            return Err(self.cursor.unexpected("an expression"));
        };
        let text = self.cursor.current_text();
        let literal = match kind {
            TokenKind::Int if text.len() > 1 && text.starts_with('0') => {
                Some((InstructionKind::Onum, text))
            }
            TokenKind::Int => Some((InstructionKind::Num, text)),
            TokenKind::HexInt => Some((InstructionKind::Xnum, text)),
            TokenKind::BinInt => Some((InstructionKind::Bnum, text)),
            TokenKind::Float => Some((InstructionKind::Float, text)),
            TokenKind::String => Some((InstructionKind::Ustr, unquote(text, 1))),
            TokenKind::RawString => Some((InstructionKind::Str, unquote(text, 1))),
            TokenKind::BitString => Some((InstructionKind::Bstr, unquote(text, 2))),
            TokenKind::HexBitString => Some((InstructionKind::Xstr, unquote(text, 2))),
            _ => None,
        };
        if let Some((atom, text)) = literal {
            self.cursor.advance();
            self.emit_atom(atom, text);
            return Ok(Operand::Value);
        }

        match kind {
            TokenKind::True | TokenKind::False | TokenKind::None => {
                self.cursor.advance();
                self.emit(match kind {
                    TokenKind::True => InstructionKind::True,
                    TokenKind::False => InstructionKind::False,
                    _ => InstructionKind::None,
                });
                Ok(Operand::Value)
            }
            TokenKind::Ident if self.cursor.peek_next() == Some(TokenKind::FatArrow) => {
                self.lambda()
            }
            TokenKind::Ident => {
                self.cursor.advance();
                self.emit_atom(InstructionKind::Id, text);
                Ok(Operand::Place)
            }
            TokenKind::LParen => {
                self.cursor.advance();
                self.expression()?;
                self.cursor.expect(TokenKind::RParen)?;
                Ok(Operand::Value)
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                self.emit(InstructionKind::ArrayBegin);
                self.comma_list(TokenKind::RBracket, |p| p.expression().map(drop))?;
                self.emit(InstructionKind::ArrayEnd);
                Ok(Operand::Value)
            }
            TokenKind::LBrace => self.object(),
            TokenKind::Function => {
                self.cursor.advance();
                self.function_rest()?;
                Ok(Operand::Value)
            }
            _ => Err(self.cursor.unexpected("an expression")),
        }
    }

    /// `x => expr`
    fn lambda(&mut self) -> Result<Operand, ParseError> {
        let param = self.cursor.advance();
        self.cursor.advance();
        self.emit(InstructionKind::FunctionBegin);
        self.emit_atom(InstructionKind::Id, param);
        self.expression()?;
        self.emit(InstructionKind::FunctionEnd);
        Ok(Operand::Value)
    }

    /// `{key: value, ..}` where a key is a name or a string.
    fn object(&mut self) -> Result<Operand, ParseError> {
        self.cursor.advance();
        self.emit(InstructionKind::ObjectBegin);
        self.comma_list(TokenKind::RBrace, |p| {
            let text = p.cursor.current_text();
            match p.cursor.peek() {
                Some(TokenKind::Ident) => p.emit_atom(InstructionKind::Id, text),
                Some(TokenKind::String) => p.emit_atom(InstructionKind::Ustr, unquote(text, 1)),
                Some(TokenKind::RawString) => p.emit_atom(InstructionKind::Str, unquote(text, 1)),
                _ => return Err(p.cursor.unexpected("an object key")),
            }
            p.cursor.advance();
            p.cursor.expect(TokenKind::Colon)?;
            p.expression().map(drop)
        })?;
        self.emit(InstructionKind::ObjectEnd);
        Ok(Operand::Value)
    }
}

/// Strip an opening delimiter of `open` bytes and the closing quote.
fn unquote(text: &str, open: usize) -> &str {
    &text[open..text.len() - 1]
}
