//! Instruction kinds and the reader/writer protocol.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::operators::{BinaryOp, UnaryOp};

/// Every instruction the front end can emit.
///
/// The declaration order is significant: the bare kinds come first and the
/// atom kinds last, starting at [`InstructionKind::Id`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum InstructionKind {
    // Statements
    EndStatement,
    Assign,
    Local,

    // Calls and literals
    CallBegin,
    CallEnd,
    BlockBegin,
    BlockEnd,
    ArrayBegin,
    ArrayEnd,
    ObjectBegin,
    ObjectEnd,
    FunctionBegin,
    FunctionEnd,

    // Binary operators
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Land,
    Lor,

    // Unary operators
    Neg,
    Pos,
    Not,

    Member,

    // Control flow
    If,
    IfElse,
    Loop0,
    Loop1,
    Loop2,
    Loop3,
    Return0,
    Return1,
    Break,
    Continue,

    // Keyword constants
    True,
    False,
    None,

    // Atoms (carry text)
    Id,
    Str,
    Ustr,
    Xstr,
    Bstr,
    Num,
    Xnum,
    Bnum,
    Onum,
    Float,
}

impl InstructionKind {
    /// All kinds in declaration order.
    pub const ALL: [InstructionKind; 53] = [
        Self::EndStatement,
        Self::Assign,
        Self::Local,
        Self::CallBegin,
        Self::CallEnd,
        Self::BlockBegin,
        Self::BlockEnd,
        Self::ArrayBegin,
        Self::ArrayEnd,
        Self::ObjectBegin,
        Self::ObjectEnd,
        Self::FunctionBegin,
        Self::FunctionEnd,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Gt,
        Self::Le,
        Self::Ge,
        Self::Land,
        Self::Lor,
        Self::Neg,
        Self::Pos,
        Self::Not,
        Self::Member,
        Self::If,
        Self::IfElse,
        Self::Loop0,
        Self::Loop1,
        Self::Loop2,
        Self::Loop3,
        Self::Return0,
        Self::Return1,
        Self::Break,
        Self::Continue,
        Self::True,
        Self::False,
        Self::None,
        Self::Id,
        Self::Str,
        Self::Ustr,
        Self::Xstr,
        Self::Bstr,
        Self::Num,
        Self::Xnum,
        Self::Bnum,
        Self::Onum,
        Self::Float,
    ];

    /// Whether instructions of this kind carry string data.
    #[inline]
    pub fn requires_text(self) -> bool {
        self >= InstructionKind::Id
    }

    /// Literal atoms: everything with text except identifiers.
    #[inline]
    pub fn is_literal_atom(self) -> bool {
        self > InstructionKind::Id
    }

    /// The binary operator this instruction reduces with, if any.
    ///
    /// `LAND`/`LOR` are not included: they short-circuit and get their own
    /// command.
    pub fn binary_op(self) -> Option<BinaryOp> {
        Some(match self {
            Self::Add => BinaryOp::Add,
            Self::Sub => BinaryOp::Sub,
            Self::Mul => BinaryOp::Mul,
            Self::Div => BinaryOp::Div,
            Self::Mod => BinaryOp::Mod,
            Self::Eq => BinaryOp::Eq,
            Self::Ne => BinaryOp::Ne,
            Self::Lt => BinaryOp::Lt,
            Self::Gt => BinaryOp::Gt,
            Self::Le => BinaryOp::Le,
            Self::Ge => BinaryOp::Ge,
            _ => return None,
        })
    }

    pub fn unary_op(self) -> Option<UnaryOp> {
        Some(match self {
            Self::Neg => UnaryOp::Neg,
            Self::Pos => UnaryOp::Pos,
            Self::Not => UnaryOp::Not,
            _ => return None,
        })
    }

    /// Number of children a `LOOPn` node takes, or `None` for other kinds.
    pub fn loop_arity(self) -> Option<usize> {
        match self {
            Self::Loop0 => Some(1),
            Self::Loop1 => Some(2),
            Self::Loop2 => Some(3),
            Self::Loop3 => Some(4),
            _ => None,
        }
    }

    /// Upper-case mnemonic used in instruction dumps.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::EndStatement => "END_STATEMENT",
            Self::Assign => "ASSIGN",
            Self::Local => "LOCAL",
            Self::CallBegin => "CALLBEGIN",
            Self::CallEnd => "CALLEND",
            Self::BlockBegin => "BLOCKBEGIN",
            Self::BlockEnd => "BLOCKEND",
            Self::ArrayBegin => "ARRAYBEGIN",
            Self::ArrayEnd => "ARRAYEND",
            Self::ObjectBegin => "OBJECTBEGIN",
            Self::ObjectEnd => "OBJECTEND",
            Self::FunctionBegin => "FUNCTIONBEGIN",
            Self::FunctionEnd => "FUNCTIONEND",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Le => "LE",
            Self::Ge => "GE",
            Self::Land => "LAND",
            Self::Lor => "LOR",
            Self::Neg => "NEG",
            Self::Pos => "POS",
            Self::Not => "NOT",
            Self::Member => "MEMBER",
            Self::If => "IF",
            Self::IfElse => "IFELSE",
            Self::Loop0 => "LOOP0",
            Self::Loop1 => "LOOP1",
            Self::Loop2 => "LOOP2",
            Self::Loop3 => "LOOP3",
            Self::Return0 => "RETURN0",
            Self::Return1 => "RETURN1",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::None => "NONE",
            Self::Id => "ID",
            Self::Str => "STR",
            Self::Ustr => "USTR",
            Self::Xstr => "XSTR",
            Self::Bstr => "BSTR",
            Self::Num => "NUM",
            Self::Xnum => "XNUM",
            Self::Bnum => "BNUM",
            Self::Onum => "ONUM",
            Self::Float => "FLOAT",
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A mnemonic that names no instruction kind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown instruction mnemonic `{0}`")]
pub struct UnknownMnemonic(pub String);

impl FromStr for InstructionKind {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.mnemonic() == s)
            .ok_or_else(|| UnknownMnemonic(s.to_string()))
    }
}

/// One owned instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstructionKind,
    /// Present exactly when `kind.requires_text()`.
    pub text: Option<String>,
}

impl Instruction {
    pub fn bare(kind: InstructionKind) -> Self {
        debug_assert!(!kind.requires_text(), "{kind} needs string data");
        Instruction { kind, text: None }
    }

    pub fn atom(kind: InstructionKind, text: impl Into<String>) -> Self {
        debug_assert!(kind.requires_text(), "{kind} carries no string data");
        Instruction {
            kind,
            text: Some(text.into()),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{} {text:?}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Pull side of the protocol.
pub trait InstructionReader {
    /// Advance to the next instruction; `false` once the stream is exhausted.
    fn move_next(&mut self) -> bool;

    /// Kind of the current instruction.
    fn kind(&self) -> InstructionKind;

    /// Text of the current instruction. Only meaningful for atoms; bare
    /// instructions return the empty string.
    fn text(&self) -> &str;
}

/// Push side of the protocol.
pub trait InstructionWriter {
    fn write_instruction(&mut self, kind: InstructionKind);

    fn write_atom(&mut self, kind: InstructionKind, text: &str);

    /// Dispatch on the kind: atoms get `text`, bare kinds ignore it.
    fn write(&mut self, kind: InstructionKind, text: &str) {
        if kind.requires_text() {
            self.write_atom(kind, text);
        } else {
            self.write_instruction(kind);
        }
    }
}
