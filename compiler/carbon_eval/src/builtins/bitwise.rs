//! `not`, the binary operator family and `popcount`.

use carbon_bits::BitOp;
use carbon_patterns::{CallContext, EvalResult, NativeFn, Value};

use super::{bits_arg, check_arity};

/// Generates the plain, clip and repeat builtins for one operator.
macro_rules! bitwise_builtins {
    ($op:expr, $plain:ident, $clip:ident, $repeat:ident) => {
        fn $plain(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
            check_arity(stringify!($plain), args, 2..=2)?;
            let result = bits_arg(&args[0])?.combine($op, bits_arg(&args[1])?)?;
            Ok(Value::bits(result))
        }

        fn $clip(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
            check_arity(stringify!($clip), args, 2..=2)?;
            let result = bits_arg(&args[0])?.combine_clip($op, bits_arg(&args[1])?);
            Ok(Value::bits(result))
        }

        fn $repeat(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
            check_arity(stringify!($repeat), args, 2..=2)?;
            let result = bits_arg(&args[0])?.combine_repeat($op, bits_arg(&args[1])?);
            Ok(Value::bits(result))
        }
    };
}

bitwise_builtins!(BitOp::And, and, andc, andr);
bitwise_builtins!(BitOp::Or, or, orc, orr);
bitwise_builtins!(BitOp::Xor, xor, xorc, xorr);
bitwise_builtins!(BitOp::Nand, nand, nandc, nandr);
bitwise_builtins!(BitOp::Nor, nor, norc, norr);
bitwise_builtins!(BitOp::Nxor, nxor, nxorc, nxorr);

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[
    ("not", not),
    ("and", and),
    ("andc", andc),
    ("andr", andr),
    ("or", or),
    ("orc", orc),
    ("orr", orr),
    ("xor", xor),
    ("xorc", xorc),
    ("xorr", xorr),
    ("nand", nand),
    ("nandc", nandc),
    ("nandr", nandr),
    ("nor", nor),
    ("norc", norc),
    ("norr", norr),
    ("nxor", nxor),
    ("nxorc", nxorc),
    ("nxorr", nxorr),
    ("popcount", popcount),
];

/// Bitwise complement; a single bit is negated as well.
fn not(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("not", args, 1..=1)?;
    if let Value::Bit(b) = args[0] {
        return Ok(Value::Bit(!b));
    }
    Ok(Value::bits(bits_arg(&args[0])?.invert()))
}

fn popcount(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("popcount", args, 1..=1)?;
    Ok(Value::Integer(bits_arg(&args[0])?.popcount() as i64))
}
