//! Tree-walking interpreter for Carbon.
//!
//! The interpreter is an [`InstructionWriter`]: the front end writes the
//! postfix instruction stream straight into it, the embedded
//! [`TreeBuilder`] assembles statement trees, and completed statements are
//! executed according to the [`ExecMode`]:
//!
//! - `Prompt`: each top-level statement runs as soon as its
//!   `END_STATEMENT` arrives. Results queue up for [`Interpreter::take_results`].
//!   A runtime error abandons only its own statement.
//! - `Batch`: statements accumulate until [`Interpreter::run_pending`]. The
//!   first runtime error stops the batch; the statements after it are
//!   discarded unexecuted.
//!
//! # Submodules
//!
//! - `eval`: per-command evaluation
//! - `function_call`: native and user function calls
//! - `builder`: [`InterpreterBuilder`]

mod builder;
mod eval;
mod function_call;

pub use builder::InterpreterBuilder;

use std::time::{Duration, Instant};

use carbon_ir::{InstructionKind, InstructionWriter};
use carbon_patterns::{CallContext, ControlAction, EvalError, EvalResult, Node, Value};

use crate::print_handler::SharedPrintHandler;
use crate::symbols::SymbolTableStack;
use crate::tree_builder::TreeBuilder;

/// Limit on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 4096;

/// When completed statements run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// Run each statement as soon as it is complete.
    #[default]
    Prompt,
    /// Collect statements until `run_pending`.
    Batch,
}

/// A Carbon interpreter: tree builder, scope chain and evaluator.
pub struct Interpreter {
    pub(crate) symbols: SymbolTableStack,
    builder: TreeBuilder,
    mode: ExecMode,
    pub(crate) print_handler: SharedPrintHandler,
    concurrency: usize,
    max_call_depth: usize,
    pub(crate) call_depth: usize,
    started: Instant,
    /// Prompt-mode results not yet taken by the host.
    results: Vec<Result<Value, EvalError>>,
    /// Whether the last batch stopped on an error.
    failed: bool,
}

impl Interpreter {
    /// An interpreter with default settings.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    /// Switch execution mode between statements, e.g. from running files
    /// to an interactive prompt. Statements already pending stay pending
    /// until the next `run_pending` or statement end.
    pub fn set_mode(&mut self, mode: ExecMode) {
        self.mode = mode;
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn symbols(&self) -> &SymbolTableStack {
        &self.symbols
    }

    /// Current value of a global binding.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.symbols.global().get(name).cloned()
    }

    pub fn define_global(&mut self, name: &str, value: Value) {
        self.symbols.define_global(name, value);
    }

    /// Whether a statement has been started but not finished.
    pub fn is_mid_statement(&self) -> bool {
        self.builder.is_mid_statement()
    }

    /// Drop a half-written statement, e.g. after a syntax error.
    pub fn discard_partial(&mut self) {
        self.builder.discard_partial();
    }

    /// Whether the last batch run stopped on a runtime error.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Results of statements executed in prompt mode, oldest first.
    pub fn take_results(&mut self) -> Vec<Result<Value, EvalError>> {
        std::mem::take(&mut self.results)
    }

    /// Run every pending statement, stopping at the first runtime error.
    ///
    /// Returns the value of the last statement, or `none` when nothing was
    /// pending.
    pub fn run_pending(&mut self) -> Result<Value, EvalError> {
        self.failed = false;
        let mut last = Value::None;
        for statement in self.builder.take_statements() {
            match statement.and_then(|node| self.execute_statement(&node)) {
                Ok(value) => last = value,
                Err(err) => {
                    self.failed = true;
                    return Err(err);
                }
            }
        }
        Ok(last)
    }

    /// Execute one top-level statement.
    ///
    /// A `return` at top level yields its value; `break` and `continue`
    /// outside a loop are errors.
    pub fn execute_statement(&mut self, node: &Node) -> Result<Value, EvalError> {
        let _span = tracing::debug_span!("statement", %node).entered();
        match self.eval(node) {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(action) => {
                let err = action.into_error();
                tracing::debug!(error = %err, "runtime error");
                Err(err)
            }
        }
    }

    fn run_completed(&mut self) {
        for statement in self.builder.take_statements() {
            let result = statement.and_then(|node| self.execute_statement(&node));
            self.results.push(result);
        }
    }

    fn after_write(&mut self, kind: InstructionKind) {
        if kind == InstructionKind::EndStatement
            && self.mode == ExecMode::Prompt
            && self.builder.pending() > 0
        {
            self.run_completed();
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionWriter for Interpreter {
    fn write_instruction(&mut self, kind: InstructionKind) {
        self.builder.push(kind, "");
        self.after_write(kind);
    }

    fn write_atom(&mut self, kind: InstructionKind, text: &str) {
        self.builder.push(kind, text);
    }
}

impl CallContext for Interpreter {
    fn call(&mut self, function: &Value, args: &[Value]) -> EvalResult {
        self.call_function(function, args)
    }

    fn print_line(&self, text: &str) {
        self.print_handler.println(text);
    }

    fn delete_symbol(&mut self, name: &str) -> bool {
        self.symbols.delete(name)
    }

    fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn fork(&self) -> Box<dyn CallContext + Send> {
        let child = InterpreterBuilder::new()
            .mode(ExecMode::Batch)
            .print_handler(self.print_handler.clone())
            .concurrency(self.concurrency)
            .max_call_depth(self.max_call_depth)
            .globals(self.symbols.global().clone())
            .started(self.started)
            .build();
        Box::new(child)
    }
}

#[cfg(test)]
mod tests;
