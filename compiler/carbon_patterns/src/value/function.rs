//! Callable values.

use std::fmt;

use crate::context::CallContext;
use crate::errors::EvalResult;
use crate::node::Node;
use crate::value::{Heap, Value};

/// Signature of every builtin.
///
/// Builtins receive the calling interpreter so they can print, call back
/// into user functions or touch the symbol table.
pub type NativeFn = fn(&mut dyn CallContext, &[Value]) -> EvalResult;

/// A builtin registered under a fixed name.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// A function literal: parameter names and a body.
///
/// Bodies do not capture the defining scope; a call runs them in a fresh
/// frame chained to the global frame.
#[derive(Debug)]
pub struct UserFunction {
    params: Vec<String>,
    body: Node,
    pure: bool,
}

impl UserFunction {
    pub fn new(params: Vec<String>, body: Node) -> Self {
        let pure = body.is_pure();
        UserFunction { params, body, pure }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn body(&self) -> &Node {
        &self.body
    }

    /// No call or non-local assignment anywhere in the body.
    pub fn is_pure(&self) -> bool {
        self.pure
    }
}

/// Either kind of callable.
#[derive(Clone, Debug)]
pub enum FunctionValue {
    Native(NativeFunction),
    User(Heap<UserFunction>),
}

impl FunctionValue {
    /// Natives compare by name; user functions by identity.
    pub fn same_function(&self, other: &FunctionValue) -> bool {
        match (self, other) {
            (FunctionValue::Native(a), FunctionValue::Native(b)) => a.name == b.name,
            (FunctionValue::User(a), FunctionValue::User(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionValue::Native(native) => write!(f, "<native {}>", native.name),
            FunctionValue::User(user) => write!(f, "<function({})>", user.params.join(", ")),
        }
    }
}
