//! `type` and the conversion builtins.

use carbon_bits::BitSequence;
use carbon_patterns::{integer_overflow, CallContext, EvalError, EvalResult, NativeFn, Value};

use super::{check_arity, count_arg};
use crate::literals::parse_integer_text;
use crate::repetition::checked_len;

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[
    ("type", type_of),
    ("integer", integer),
    ("float", float),
    ("string", string),
    ("binseq", binseq),
    ("bit", bit),
    ("array", array),
    ("object", object),
];

fn cannot_convert(value: &Value, target: &str) -> EvalError {
    EvalError::new(format!("cannot convert {} to {target}", value.type_name()))
}

fn type_of(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("type", args, 1..=1)?;
    Ok(Value::string(args[0].type_name()))
}

/// Floats truncate toward zero; bit sequences read their low 64 bits as an
/// unsigned value.
fn integer(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("integer", args, 1..=1)?;
    let value = &args[0];
    let n = match value {
        Value::Integer(n) => *n,
        Value::Float(f) => {
            let truncated = f.trunc();
            if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(integer_overflow("float conversion").into());
            }
            truncated as i64
        }
        Value::Bit(b) => i64::from(*b),
        Value::Bits(bits) => bits.to_u64() as i64,
        Value::Str(text) => parse_integer_text(text)
            .ok_or_else(|| EvalError::new(format!("cannot convert \"{}\" to integer", &**text)))?,
        other => return Err(cannot_convert(other, "integer").into()),
    };
    Ok(Value::Integer(n))
}

fn float(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("float", args, 1..=1)?;
    let value = &args[0];
    let f = match value {
        Value::Integer(n) => *n as f64,
        Value::Float(f) => *f,
        Value::Str(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| EvalError::new(format!("cannot convert \"{}\" to float", &**text)))?,
        other => return Err(cannot_convert(other, "float").into()),
    };
    Ok(Value::Float(f))
}

fn string(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("string", args, 1..=1)?;
    match &args[0] {
        text @ Value::Str(_) => Ok(text.clone()),
        other => Ok(Value::string(other.to_string())),
    }
}

/// `binseq(v, width?)`. The width applies to integers only and defaults
/// to 64 bits.
fn binseq(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("binseq", args, 1..=2)?;
    let value = &args[0];
    if let Some(width) = args.get(1) {
        let Value::Integer(n) = value else {
            return Err(EvalError::new("binseq width applies to integers only").into());
        };
        let width = checked_len(1, count_arg(width)?, "bit sequence width")?;
        return Ok(Value::bits(BitSequence::from_word(*n as u64, width)));
    }
    let bits = match value {
        Value::Integer(n) => BitSequence::from(*n as u64),
        Value::Str(text) => BitSequence::from_c_str(text),
        Value::Bit(b) => BitSequence::from_bit(*b),
        Value::Bits(_) => return Ok(value.clone()),
        Value::Array(items) => {
            let mut joined = BitSequence::new();
            for item in items.read().iter() {
                joined = match item {
                    Value::Bits(part) => joined.concat(part),
                    Value::Bit(b) => joined.concat(&BitSequence::from_bit(*b)),
                    other => return Err(cannot_convert(other, "bits").into()),
                };
            }
            joined
        }
        other => return Err(cannot_convert(other, "bits").into()),
    };
    Ok(Value::bits(bits))
}

fn bit(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("bit", args, 1..=1)?;
    let value = &args[0];
    let b = match value {
        Value::Bit(b) => *b,
        Value::Integer(n) => *n != 0,
        Value::Bits(bits) if bits.len() == 1 => bits.get(0).unwrap_or(false),
        Value::Str(text) if &***text == "0" => false,
        Value::Str(text) if &***text == "1" => true,
        other => return Err(cannot_convert(other, "bit").into()),
    };
    Ok(Value::Bit(b))
}

fn array(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    Ok(Value::array(args.to_vec()))
}

fn object(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("object", args, 0..=0)?;
    Ok(Value::empty_object())
}
