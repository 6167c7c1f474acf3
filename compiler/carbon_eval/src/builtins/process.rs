//! Process control and interpreter housekeeping.

use std::process::Command;

use carbon_patterns::{io_error, CallContext, EvalResult, NativeFn, Value};
use tracing::debug;

use super::{check_arity, integer_arg, string_arg};

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[
    ("system", system),
    ("exit", exit),
    ("delete", delete),
    ("clock", clock),
];

/// Run a command through `sh -c` and return its exit status. A process
/// killed by a signal reports `-1`.
fn system(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("system", args, 1..=1)?;
    let command = string_arg(&args[0])?;
    debug!(command, "system");
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .map_err(|err| io_error(&err))?;
    Ok(Value::Integer(status.code().map_or(-1, i64::from)))
}

/// Terminate the process; the default status is 0.
fn exit(_: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("exit", args, 0..=1)?;
    let code = match args.first() {
        Some(value) => integer_arg(value)?,
        None => 0,
    };
    debug!(code, "exit");
    std::process::exit(code as i32)
}

fn delete(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("delete", args, 1..=1)?;
    let name = string_arg(&args[0])?;
    Ok(Value::Bit(ctx.delete_symbol(name)))
}

/// Seconds since the interpreter started.
fn clock(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("clock", args, 0..=0)?;
    Ok(Value::Float(ctx.uptime().as_secs_f64()))
}
