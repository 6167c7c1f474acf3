//! Binary operator implementations for the evaluator.
//!
//! Dispatch is on the runtime type of the first operand; the second must
//! have the same type, with two exceptions:
//! - `==` and `!=` accept `none` on either side
//! - `integer * string|bits|array` is commuted so the container's
//!   repetition applies (the symmetric swap for `+` is not done)
//!
//! The type set is closed, so plain `match` dispatch is used throughout.

use std::cmp::Ordering;

use carbon_bits::BitSequence;
use carbon_ir::BinaryOp;
use carbon_patterns::{
    division_by_zero, integer_overflow, type_mismatch, unsupported_operator, EvalError,
    EvalResult, Value,
};

use crate::repetition::{checked_len, repeat_array, repeat_string};

/// Checked integer arithmetic; `None` means overflow.
#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result
        .map(Value::Integer)
        .ok_or_else(|| integer_overflow(op_name).into())
}

/// Checked division or remainder with zero guard.
#[inline]
fn checked_div(is_zero: bool, op: impl FnOnce() -> Option<i64>, op_name: &'static str) -> EvalResult {
    if is_zero {
        Err(division_by_zero().into())
    } else {
        checked_arith(op(), op_name)
    }
}

/// Result of an ordering operator given the comparison outcome.
fn ordering_result(op: BinaryOp, ordering: Ordering) -> bool {
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::Ne => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        _ => panic!("implementation error: {op} is not a comparison"),
    }
}

fn is_comparison(op: BinaryOp) -> bool {
    !op.is_arithmetic()
}

/// Number of copies for `*` on strings, bit sequences and arrays.
fn repetitions(count: i64) -> Result<usize, EvalError> {
    usize::try_from(count).map_err(|_| EvalError::new(format!("negative repeat count: {count}")))
}

/// Evaluate `left op right`.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    if op.is_equality() && (left.is_none() || right.is_none()) {
        let equal = left.is_none() && right.is_none();
        return Ok(Value::Bit(equal == (op == BinaryOp::Eq)));
    }
    if op == BinaryOp::Mul
        && matches!(left, Value::Integer(_))
        && matches!(right, Value::Str(_) | Value::Bits(_) | Value::Array(_))
    {
        return evaluate_binary(right, left, op);
    }

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Bit(a), Value::Bit(b)) => eval_bit_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        (Value::Str(a), Value::Integer(n)) if op == BinaryOp::Mul => {
            Ok(repeat_string(a, repetitions(*n)?)?)
        }
        (Value::Bits(a), Value::Bits(b)) => eval_bits_binary(a, b, op),
        (Value::Bits(a), Value::Integer(n)) if op == BinaryOp::Mul => {
            let total = checked_len(a.len(), repetitions(*n)?, "bits repetition")?;
            Ok(Value::bits(a.repeat(total)?))
        }
        (Value::Array(_), Value::Array(_)) => eval_array_binary(left, right, op),
        (Value::Array(items), Value::Integer(n)) if op == BinaryOp::Mul => {
            Ok(repeat_array(&items.read(), repetitions(*n)?)?)
        }
        (Value::Object(_) | Value::Function(_), _) if left.type_name() == right.type_name() => {
            match op {
                BinaryOp::Eq => Ok(Value::Bit(left == right)),
                BinaryOp::Ne => Ok(Value::Bit(left != right)),
                _ => Err(unsupported_operator(op.as_symbol(), left.type_name()).into()),
            }
        }
        (Value::None, _) => Err(unsupported_operator(op.as_symbol(), "none").into()),
        _ => Err(type_mismatch(left.type_name(), right.type_name()).into()),
    }
}

fn eval_integer_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => checked_div(b == 0, || a.checked_div(b), "division"),
        BinaryOp::Mod => checked_div(b == 0, || a.checked_rem(b), "remainder"),
        _ => Ok(Value::Bit(ordering_result(op, a.cmp(&b)))),
    }
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div | BinaryOp::Mod if b == 0.0 => Err(division_by_zero().into()),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        // NaN is unordered: every comparison but `!=` is false
        _ => Ok(Value::Bit(match a.partial_cmp(&b) {
            Some(ordering) => ordering_result(op, ordering),
            None => op == BinaryOp::Ne,
        })),
    }
}

fn eval_bit_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bit(a == b)),
        BinaryOp::Ne => Ok(Value::Bit(a != b)),
        _ => Err(unsupported_operator(op.as_symbol(), "bit").into()),
    }
}

/// Lexicographic by code point.
fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => {
            let mut result = String::with_capacity(a.len() + b.len());
            result.push_str(a);
            result.push_str(b);
            Ok(Value::string(result))
        }
        _ if is_comparison(op) => Ok(Value::Bit(ordering_result(op, a.cmp(b)))),
        _ => Err(unsupported_operator(op.as_symbol(), "string").into()),
    }
}

/// Equality for any lengths; ordering only for equal lengths.
fn eval_bits_binary(a: &BitSequence, b: &BitSequence, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::bits(a + b)),
        BinaryOp::Eq => Ok(Value::Bit(a == b)),
        BinaryOp::Ne => Ok(Value::Bit(a != b)),
        _ if is_comparison(op) => Ok(Value::Bit(ordering_result(op, a.try_cmp(b)?))),
        _ => Err(unsupported_operator(op.as_symbol(), "bits").into()),
    }
}

fn eval_array_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let (Value::Array(a), Value::Array(b)) = (left, right) else {
        panic!("implementation error: array operator on {}", left.type_name());
    };
    match op {
        BinaryOp::Add => {
            let mut result = a.read().clone();
            // `b` may alias `a`; the first guard is already released
            result.extend(b.read().iter().cloned());
            Ok(Value::array(result))
        }
        BinaryOp::Eq => Ok(Value::Bit(left == right)),
        BinaryOp::Ne => Ok(Value::Bit(left != right)),
        _ => Err(unsupported_operator(op.as_symbol(), "array").into()),
    }
}

#[cfg(test)]
mod tests;
