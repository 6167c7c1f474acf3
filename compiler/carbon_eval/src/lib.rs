#![allow(
    clippy::result_large_err,
    reason = "ControlAction carries EvalError by value on every evaluation path"
)]
//! Carbon Eval - tree builder and tree-walking interpreter for Carbon.
//!
//! # Architecture
//!
//! The front end writes postfix instructions into an [`Interpreter`]
//! (an `InstructionWriter`). Inside it:
//! - `TreeBuilder`: assembles statement trees and folds constant operators
//! - `SymbolTableStack`: the scope chain, with call scopes chained to the global frame
//! - `evaluate_binary` / `evaluate_unary`: enum-based operator dispatch on runtime types
//! - `builtins`: the native function library bound in the global frame
//!
//! # Re-exports
//!
//! The value model comes from `carbon_patterns` and is re-exported here:
//! - `Value`, `FunctionValue`, `Heap`, `Node`
//! - `EvalError`, `EvalErrorKind`, `EvalResult`, `ControlAction`

mod builtins;
pub mod interpreter;
mod literals;
mod operators;
mod print_handler;
mod repetition;
mod stack;
mod symbols;
mod tree_builder;
mod unary_operators;

pub use carbon_patterns::{
    CallContext, ControlAction, EvalError, EvalErrorKind, EvalResult, FunctionValue, Heap, Node,
    Value,
};

pub use interpreter::{ExecMode, Interpreter, InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use literals::{parse_atom, parse_integer_text};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandler,
    SharedPrintHandler,
};
pub use symbols::{Frame, SymbolTableStack};
pub use tree_builder::{Statement, TreeBuilder};
pub use unary_operators::evaluate_unary;
