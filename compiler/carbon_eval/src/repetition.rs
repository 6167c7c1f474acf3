//! Bounded repetition.
//!
//! Every operation whose output size comes from a script-supplied count
//! checks that size here first, so an absurd count is a runtime error
//! rather than an allocation failure.

use carbon_patterns::{integer_overflow, EvalError, Value};

/// Largest number of elements, bytes or bits one operation may produce.
pub const MAX_OUTPUT_LEN: usize = u32::MAX as usize;

/// `unit * count`, or an overflow error naming `operation` when the product
/// overflows or exceeds [`MAX_OUTPUT_LEN`].
pub(crate) fn checked_len(unit: usize, count: usize, operation: &str) -> Result<usize, EvalError> {
    unit.checked_mul(count)
        .filter(|&len| len <= MAX_OUTPUT_LEN)
        .ok_or_else(|| integer_overflow(operation))
}

/// `count` copies of `text`.
pub(crate) fn repeat_string(text: &str, count: usize) -> Result<Value, EvalError> {
    checked_len(text.len(), count, "string repetition")?;
    Ok(Value::string(text.repeat(count)))
}

/// `count` copies of `items`, end to end.
pub(crate) fn repeat_array(items: &[Value], count: usize) -> Result<Value, EvalError> {
    let len = checked_len(items.len(), count, "array repetition")?;
    Ok(Value::array(items.iter().cycle().take(len).cloned().collect()))
}
