//! Function calls.

use carbon_patterns::{
    not_callable, stack_overflow, ControlAction, EvalResult, FunctionValue, UserFunction, Value,
};

use super::Interpreter;
use crate::stack::ensure_sufficient_stack;

impl Interpreter {
    /// Call a function value with evaluated arguments.
    pub(crate) fn call_function(&mut self, function: &Value, args: &[Value]) -> EvalResult {
        match function {
            Value::Function(FunctionValue::Native(native)) => {
                tracing::trace!(name = native.name, args = args.len(), "native call");
                (native.func)(self, args)
            }
            Value::Function(FunctionValue::User(user)) => self.call_user(user, args),
            other => Err(not_callable(other.type_name()).into()),
        }
    }

    /// Run a user function in a fresh frame chained to the global frame.
    ///
    /// Parameters bind positionally; missing arguments are `none` and extra
    /// ones are ignored. A `return` is unwrapped into the call's value.
    fn call_user(&mut self, function: &UserFunction, args: &[Value]) -> EvalResult {
        if self.call_depth >= self.max_call_depth {
            return Err(stack_overflow(self.max_call_depth).into());
        }
        let scope = self.symbols.enter_call();
        for (index, param) in function.params().iter().enumerate() {
            let arg = args.get(index).cloned().unwrap_or(Value::None);
            self.symbols.define_local(param, arg);
        }

        self.call_depth += 1;
        let result = ensure_sufficient_stack(|| self.eval(function.body()));
        self.call_depth -= 1;
        self.symbols.leave_call(scope);

        match result {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(err)) => Err(ControlAction::Error(err)),
            Err(escaped @ (ControlAction::Break | ControlAction::Continue)) => {
                Err(escaped.into_error().into())
            }
        }
    }
}
