//! Prefix operators.

use carbon_ir::UnaryOp;
use carbon_patterns::{integer_overflow, unsupported_operator, EvalResult, Value};

/// Evaluate `op operand`.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Neg, Value::Integer(n)) => n
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| integer_overflow("negation").into()),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Pos, Value::Integer(_) | Value::Float(_)) => Ok(operand.clone()),
        (UnaryOp::Not, Value::Bit(b)) => Ok(Value::Bit(!b)),
        (UnaryOp::Not, Value::Bits(bits)) => Ok(Value::bits(bits.invert())),
        _ => Err(unsupported_operator(op.as_symbol(), operand.type_name()).into()),
    }
}
