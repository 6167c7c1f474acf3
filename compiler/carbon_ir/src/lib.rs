//! Carbon IR - the flat instruction protocol.
//!
//! The front end never builds a tree. It emits a postfix stream of
//! instructions through an [`InstructionWriter`]; the tree builder in
//! `carbon_eval` consumes that stream and assembles the AST.
//!
//! Instructions come in two classes:
//! - **bare** instructions (`END_STATEMENT`, `ASSIGN`, operators, bracket
//!   markers, control flow) carry no payload
//! - **atom** instructions (`ID`, string and number literals) carry the
//!   token text
//!
//! Every kind ordered at or after [`InstructionKind::Id`] is an atom; see
//! [`InstructionKind::requires_text`].

mod buffer;
mod instruction;
mod operators;

pub use buffer::{transfer, BufferReader, InstructionBuffer};
pub use instruction::{
    Instruction, InstructionKind, InstructionReader, InstructionWriter, UnknownMnemonic,
};
pub use operators::{BinaryOp, UnaryOp};
