//! The interpreter surface visible to builtins.

use std::time::Duration;

use crate::errors::EvalResult;
use crate::value::Value;

/// What a native function may ask of the interpreter that called it.
///
/// Implemented by the evaluator. Builtins that need none of this simply
/// ignore the context argument.
pub trait CallContext {
    /// Call a function value (native or user) with already evaluated arguments.
    ///
    /// A `return` inside the callee is unwrapped; the result is its value.
    fn call(&mut self, function: &Value, args: &[Value]) -> EvalResult;

    /// Write one line to the configured print handler.
    fn print_line(&self, text: &str);

    /// Remove the binding `name` from the innermost scope holding it.
    /// Returns whether a binding was removed.
    fn delete_symbol(&mut self, name: &str) -> bool;

    /// Time since the interpreter was created.
    fn uptime(&self) -> Duration;

    /// Default worker count for parallel dispatch.
    fn concurrency(&self) -> usize;

    /// A child interpreter for use on another thread.
    ///
    /// The child's global frame is a snapshot of this interpreter's global
    /// frame; containers inside it are still shared with the parent.
    fn fork(&self) -> Box<dyn CallContext + Send>;
}
