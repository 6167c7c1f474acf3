//! One interpreter shared by every unit of a run.
//!
//! Files and `--eval` sources run as batch units: the whole unit is parsed
//! first, then its statements run until the first runtime error. Prompt
//! input runs statement by statement and an error abandons only its own
//! statement. Globals persist across units either way.

use carbon_eval::{EvalError, ExecMode, Interpreter, Value};
use carbon_parse::ParseError;
use thiserror::Error;

use crate::host;

/// Why a unit did not run to completion.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] EvalError),
}

pub struct Session {
    interp: Interpreter,
}

impl Session {
    pub fn new(interp: Interpreter) -> Self {
        Session { interp }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interp
    }

    /// Bind `arguments` and `environment`.
    pub fn inject_host(&mut self, arguments: &[String], environment: &[(String, String)]) {
        let mode = self.interp.mode();
        self.interp.set_mode(ExecMode::Batch);
        host::write_bindings(&mut self.interp, arguments, environment);
        if let Err(err) = self.interp.run_pending() {
            panic!("implementation error: host bindings failed: {err}");
        }
        self.interp.set_mode(mode);
    }

    /// Run a batch unit, returning the value of its last statement.
    pub fn run_unit(&mut self, source: &str) -> Result<Value, RunError> {
        let buffer = carbon_parse::parse(source)?;
        self.interp.set_mode(ExecMode::Batch);
        buffer.replay(&mut self.interp);
        Ok(self.interp.run_pending()?)
    }

    /// Run prompt input, returning each statement's outcome in order.
    pub fn run_prompt(&mut self, source: &str) -> Result<Vec<Result<Value, EvalError>>, ParseError> {
        let buffer = carbon_parse::parse(source)?;
        self.interp.set_mode(ExecMode::Prompt);
        buffer.replay(&mut self.interp);
        Ok(self.interp.take_results())
    }
}
