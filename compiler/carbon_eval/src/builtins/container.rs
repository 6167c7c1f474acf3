//! Element access, slicing and repetition.
//!
//! Strings index by character. Arrays and objects are shared containers:
//! `set` on them writes in place. Strings and bit sequences are immutable,
//! so `set` on them returns an updated copy.

use carbon_patterns::{
    index_out_of_bounds, type_mismatch, CallContext, EvalError, EvalResult, NativeFn, Value,
};

use super::{check_arity, count_arg, index_arg, string_arg};
use crate::repetition::{checked_len, repeat_array, repeat_string};

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[
    ("get", get),
    ("set", set),
    ("length", length),
    ("head", head),
    ("tail", tail),
    ("subseq", subseq),
    ("repeat", repeat),
    ("properties", properties),
];

fn get(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("get", args, 2..=2)?;
    let key = &args[1];
    match &args[0] {
        Value::Str(text) => {
            let index = index_arg(key, text.chars().count())?;
            let c = text.chars().nth(index).unwrap_or_default();
            Ok(Value::string(c.to_string()))
        }
        Value::Array(items) => {
            let items = items.read();
            let index = index_arg(key, items.len())?;
            Ok(items[index].clone())
        }
        Value::Bits(bits) => {
            let index = index_arg(key, bits.len())?;
            Ok(Value::Bit(bits.get(index).unwrap_or(false)))
        }
        Value::Object(fields) => {
            let name = string_arg(key)?;
            Ok(fields.read().get(name).cloned().unwrap_or(Value::None))
        }
        other => Err(type_mismatch("container", other.type_name()).into()),
    }
}

fn set(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("set", args, 3..=3)?;
    let (container, key, value) = (&args[0], &args[1], &args[2]);
    match container {
        Value::Array(items) => {
            let mut items = items.write();
            let index = index_arg(key, items.len())?;
            items[index] = value.clone();
            drop(items);
            Ok(container.clone())
        }
        Value::Object(fields) => {
            let name = string_arg(key)?;
            fields.write().insert(name.to_string(), value.clone());
            Ok(container.clone())
        }
        Value::Str(text) => {
            let index = index_arg(key, text.chars().count())?;
            let replacement = string_arg(value)?;
            let updated: String = text
                .chars()
                .enumerate()
                .map(|(i, c)| if i == index { replacement.to_string() } else { c.to_string() })
                .collect();
            Ok(Value::string(updated))
        }
        Value::Bits(bits) => {
            let index = index_arg(key, bits.len())?;
            let bit = value
                .as_bit()
                .ok_or_else(|| type_mismatch("bit", value.type_name()))?;
            let mut updated = (**bits).clone();
            updated.set(index, bit)?;
            Ok(Value::bits(updated))
        }
        other => Err(type_mismatch("container", other.type_name()).into()),
    }
}

fn length(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("length", args, 1..=1)?;
    let len = match &args[0] {
        Value::Str(text) => text.chars().count(),
        Value::Array(items) => items.read().len(),
        Value::Bits(bits) => bits.len(),
        Value::Object(fields) => fields.read().len(),
        other => return Err(type_mismatch("container", other.type_name()).into()),
    };
    Ok(Value::Integer(len as i64))
}

/// `offset..offset + size` within `len`, or an out-of-bounds error naming
/// the first element past the end.
fn check_range(offset: usize, size: usize, len: usize) -> Result<(), EvalError> {
    match offset.checked_add(size) {
        Some(end) if end <= len => Ok(()),
        _ => Err(index_out_of_bounds(
            i64::try_from(offset.saturating_add(size)).unwrap_or(i64::MAX),
            len,
        )),
    }
}

/// Shared by `head`, `tail` and `subseq`.
fn slice(value: &Value, offset: usize, size: usize) -> EvalResult {
    match value {
        Value::Bits(bits) => Ok(Value::bits(bits.subseq(offset, size)?)),
        Value::Str(text) => {
            check_range(offset, size, text.chars().count())?;
            Ok(Value::string(text.chars().skip(offset).take(size).collect::<String>()))
        }
        Value::Array(items) => {
            let items = items.read();
            check_range(offset, size, items.len())?;
            Ok(Value::array(items[offset..offset + size].to_vec()))
        }
        other => Err(type_mismatch("bits, string or array", other.type_name()).into()),
    }
}

fn sequence_len(value: &Value) -> usize {
    match value {
        Value::Bits(bits) => bits.len(),
        Value::Str(text) => text.chars().count(),
        Value::Array(items) => items.read().len(),
        _ => 0,
    }
}

fn head(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("head", args, 2..=2)?;
    slice(&args[0], 0, count_arg(&args[1])?)
}

fn tail(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("tail", args, 2..=2)?;
    let n = count_arg(&args[1])?;
    let len = sequence_len(&args[0]);
    if n > len {
        // let `slice` report the type or range problem
        return slice(&args[0], len, n);
    }
    slice(&args[0], len - n, n)
}

fn subseq(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("subseq", args, 3..=3)?;
    slice(&args[0], count_arg(&args[1])?, count_arg(&args[2])?)
}

/// Bits repeat to exactly `n` bits; strings and arrays to `n` copies.
fn repeat(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("repeat", args, 2..=2)?;
    let n = count_arg(&args[1])?;
    match &args[0] {
        Value::Bits(bits) => {
            checked_len(1, n, "bits repetition")?;
            Ok(Value::bits(bits.repeat(n)?))
        }
        Value::Str(text) => Ok(repeat_string(text, n)?),
        Value::Array(items) => Ok(repeat_array(&items.read(), n)?),
        other => Err(type_mismatch("bits, string or array", other.type_name()).into()),
    }
}

fn properties(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("properties", args, 1..=1)?;
    let Value::Object(fields) = &args[0] else {
        return Err(type_mismatch("object", args[0].type_name()).into());
    };
    let mut names: Vec<String> = fields.read().keys().cloned().collect();
    names.sort_unstable();
    Ok(Value::array(names.into_iter().map(Value::string).collect()))
}
