//! `InterpreterBuilder` for creating interpreters with various configurations.

use std::time::Instant;

use super::{ExecMode, Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::builtins;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::symbols::{Frame, SymbolTableStack};
use crate::tree_builder::TreeBuilder;

/// Builder for [`Interpreter`].
///
/// Defaults: prompt mode, stdout printing, one parallel worker per
/// available core.
pub struct InterpreterBuilder {
    mode: ExecMode,
    print_handler: Option<SharedPrintHandler>,
    concurrency: Option<usize>,
    max_call_depth: usize,
    globals: Option<Frame>,
    started: Option<Instant>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            mode: ExecMode::default(),
            print_handler: None,
            concurrency: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            globals: None,
            started: None,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    /// Where `print` writes. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Default worker count of `parallel`.
    #[must_use]
    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = Some(workers.max(1));
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Start from an existing global frame instead of a fresh one holding
    /// the builtins.
    #[must_use]
    pub(crate) fn globals(mut self, frame: Frame) -> Self {
        self.globals = Some(frame);
        self
    }

    /// Share the parent's clock.
    #[must_use]
    pub(crate) fn started(mut self, started: Instant) -> Self {
        self.started = Some(started);
        self
    }

    pub fn build(self) -> Interpreter {
        let symbols = match self.globals {
            Some(frame) => SymbolTableStack::with_global(frame),
            None => {
                let mut symbols = SymbolTableStack::new();
                builtins::register(&mut symbols);
                symbols
            }
        };
        let concurrency = self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        });
        Interpreter {
            symbols,
            builder: TreeBuilder::new(),
            mode: self.mode,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            concurrency,
            max_call_depth: self.max_call_depth,
            call_depth: 0,
            started: self.started.unwrap_or_else(Instant::now),
            results: Vec::new(),
            failed: false,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
