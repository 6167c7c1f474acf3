#![allow(
    clippy::result_large_err,
    reason = "ControlAction carries EvalError by value on every evaluation path"
)]
//! Carbon Patterns - the runtime model shared by the tree builder, the
//! evaluator and the builtin library.
//!
//! This crate provides:
//! - Runtime values (`Value`, `Heap`, `FunctionValue`)
//! - The AST (`Node`, `Command`, `CommandKind`, `CommandFlags`)
//! - Evaluation errors and control propagation (`EvalError`, `ControlAction`)
//! - The `CallContext` seam native functions call back through
//! - Parallel dispatch (`TaskGroup`, `WorkerPool`) backing the `parallel` builtin
//!
//! # Values
//!
//! Heap payloads go through `Heap<T>`, whose constructor is private to the
//! value module, so every allocation goes through a `Value::` factory.
//! Arrays and objects sit behind a `RwLock` and are shared by reference:
//! mutating one through a builtin is visible through every alias.

mod context;
mod errors;
mod node;
mod parallel;
mod value;

pub use context::CallContext;
pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult};
pub use node::{Command, CommandFlags, CommandKind, Node};
pub use parallel::{TaskGroup, WorkerPool};
pub use value::{FunctionValue, Heap, NativeFn, NativeFunction, ObjectMap, UserFunction, Value};

// Error constructors used across crates
pub use errors::{
    control_outside_loop, division_by_zero, index_out_of_bounds, integer_overflow,
    invalid_assignment_target, invalid_literal, io_error, not_callable, stack_overflow,
    type_mismatch, undefined_variable, unsupported_operator, wrong_arg_count,
};
