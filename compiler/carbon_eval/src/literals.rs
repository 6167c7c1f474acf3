//! Text of literal atoms to values.
//!
//! String atoms arrive without their quotes; prefixed numbers arrive with
//! their prefix (`0x1f`, `0b101`, `017`).

use carbon_bits::BitSequence;
use carbon_ir::InstructionKind;
use carbon_patterns::{invalid_literal, EvalError, Value};

/// Parse the text of a literal atom.
pub fn parse_atom(kind: InstructionKind, text: &str) -> Result<Value, EvalError> {
    let value = match kind {
        InstructionKind::Num => text.parse::<i64>().ok().map(Value::Integer),
        InstructionKind::Xnum => strip_prefix(text, 'x')
            .and_then(|digits| parse_radix(digits, 16))
            .map(Value::Integer),
        InstructionKind::Bnum => strip_prefix(text, 'b')
            .and_then(|digits| parse_radix(digits, 2))
            .map(Value::Integer),
        InstructionKind::Onum => parse_radix(text, 8).map(Value::Integer),
        InstructionKind::Float => text.parse::<f64>().ok().map(Value::Float),
        InstructionKind::Str => Some(Value::string(text)),
        InstructionKind::Ustr => unescape(text).map(Value::string),
        InstructionKind::Bstr => Some(Value::bits(BitSequence::from_bit_chars(text))),
        InstructionKind::Xstr => Some(Value::bits(BitSequence::from_hex_chars(text))),
        other => panic!("implementation error: {other} is not a literal atom"),
    };
    value.ok_or_else(|| invalid_literal(text))
}

fn strip_prefix(text: &str, marker: char) -> Option<&str> {
    let rest = text.strip_prefix('0')?;
    rest.strip_prefix(marker)
        .or_else(|| rest.strip_prefix(marker.to_ascii_uppercase()))
}

/// Non-decimal literals denote a 64-bit pattern, so `0xffffffffffffffff`
/// is `-1` rather than an overflow.
fn parse_radix(digits: &str, radix: u32) -> Option<i64> {
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|n| n as i64)
}

/// Integer text as the `integer` builtin accepts it: an optional sign
/// followed by a decimal, `0x`, `0b` or leading-zero octal literal.
pub fn parse_integer_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let magnitude = if let Some(hex) = strip_prefix(body, 'x') {
        parse_radix(hex, 16)?
    } else if let Some(bin) = strip_prefix(body, 'b') {
        parse_radix(bin, 2)?
    } else if body.len() > 1 && body.starts_with('0') {
        parse_radix(body, 8)?
    } else {
        body.parse::<i64>().ok()?
    };
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}

/// Resolve backslash escapes: `\n \t \r \0 \\ \" \'` and `\xHH`.
fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => {
                let hi = chars.next()?.to_digit(16)?;
                let lo = chars.next()?.to_digit(16)?;
                out.push(char::from_u32(hi * 16 + lo)?);
            }
            _ => return None,
        }
    }
    Some(out)
}
