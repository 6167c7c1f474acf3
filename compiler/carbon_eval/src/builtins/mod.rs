//! The builtin function library.
//!
//! Every builtin is a [`NativeFn`] registered in the global frame when an
//! interpreter is built. Builtins check their own arity and argument types
//! and report problems as ordinary runtime errors.
//!
//! # Submodules
//!
//! - `convert`: `type` and the conversions
//! - `container`: element access and slicing on strings, arrays, bits and objects
//! - `bitwise`: the `not`/`and`/... family and `popcount`
//! - `io`: `print`, `read`, `write`
//! - `process`: `system`, `exit`, `delete`, `clock`
//! - `parallel`: fan-out over worker threads

mod bitwise;
mod container;
mod convert;
mod io;
mod parallel;
mod process;

use std::ops::RangeInclusive;

use carbon_bits::BitSequence;
use carbon_patterns::{index_out_of_bounds, type_mismatch, wrong_arg_count, EvalError, NativeFn, Value};

use crate::symbols::SymbolTableStack;

/// Bind every builtin in the global frame.
pub(crate) fn register(symbols: &mut SymbolTableStack) {
    let tables: [&[(&'static str, NativeFn)]; 6] = [
        convert::FUNCTIONS,
        container::FUNCTIONS,
        bitwise::FUNCTIONS,
        io::FUNCTIONS,
        process::FUNCTIONS,
        parallel::FUNCTIONS,
    ];
    for &(name, func) in tables.into_iter().flatten() {
        symbols.define_global(name, Value::native(name, func));
    }
}

/// Fail unless `args.len()` is within `expected`.
fn check_arity(name: &str, args: &[Value], expected: RangeInclusive<usize>) -> Result<(), EvalError> {
    if expected.contains(&args.len()) {
        return Ok(());
    }
    let (low, high) = expected.into_inner();
    let expected = if low == high {
        low.to_string()
    } else {
        format!("{low} to {high}")
    };
    Err(wrong_arg_count(name, &expected, args.len()))
}

fn integer_arg(value: &Value) -> Result<i64, EvalError> {
    value
        .as_integer()
        .ok_or_else(|| type_mismatch("integer", value.type_name()))
}

fn string_arg(value: &Value) -> Result<&str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| type_mismatch("string", value.type_name()))
}

fn bits_arg(value: &Value) -> Result<&BitSequence, EvalError> {
    value
        .as_bits()
        .ok_or_else(|| type_mismatch("bits", value.type_name()))
}

/// A non-negative count or size.
fn count_arg(value: &Value) -> Result<usize, EvalError> {
    let n = integer_arg(value)?;
    usize::try_from(n).map_err(|_| EvalError::new(format!("expected a non-negative count, got {n}")))
}

/// An element index, checked against `len` with a strict bound.
fn index_arg(value: &Value, len: usize) -> Result<usize, EvalError> {
    let n = integer_arg(value)?;
    match usize::try_from(n) {
        Ok(index) if index < len => Ok(index),
        _ => Err(index_out_of_bounds(n, len)),
    }
}
