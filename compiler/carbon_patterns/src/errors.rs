//! Evaluation errors and control propagation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the typed category; the factory functions at the
//! bottom of this module are the public way to build errors and keep `kind`
//! and `message` in sync.
//!
//! # Control Propagation
//!
//! Evaluation returns [`EvalResult`]. The `Err` side is a [`ControlAction`]:
//! a runtime error or one of the `break`/`continue`/`return` signals. Every
//! compound node stops at the first `Err` from a child and hands it upward
//! with `?`; loops and function calls are the only places that catch signals.

use std::fmt;

use carbon_bits::BitSeqError;

use crate::value::Value;

/// Result of evaluating a node.
pub type EvalResult = Result<Value, ControlAction>;

/// Non-local exit from evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// A runtime error abandoning the current top-level statement.
    Error(EvalError),
    /// Leave the innermost loop.
    Break,
    /// Skip to the next iteration of the innermost loop.
    Continue,
    /// Leave the innermost function call with a value.
    Return(Value),
}

impl ControlAction {
    /// Turn a signal that escaped its construct into an error.
    ///
    /// `Return` at top level is not an escape; callers handle it first.
    pub fn into_error(self) -> EvalError {
        match self {
            ControlAction::Error(err) => err,
            ControlAction::Break => control_outside_loop("break"),
            ControlAction::Continue => control_outside_loop("continue"),
            ControlAction::Return(_) => control_outside_loop("return"),
        }
    }
}

impl From<EvalError> for ControlAction {
    fn from(err: EvalError) -> Self {
        ControlAction::Error(err)
    }
}

impl From<BitSeqError> for ControlAction {
    fn from(err: BitSeqError) -> Self {
        ControlAction::Error(err.into())
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Access
    Undefined {
        name: String,
    },
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },

    // Type/Operator
    TypeMismatch {
        expected: String,
        got: String,
    },
    UnsupportedOperator {
        op: String,
        type_name: String,
    },
    LengthMismatch {
        op: String,
        left: usize,
        right: usize,
    },

    // Arithmetic
    DivisionByZero,
    IntegerOverflow {
        operation: String,
    },

    // Function
    NotCallable {
        type_name: String,
    },
    WrongArgCount {
        function: String,
        expected: String,
        got: usize,
    },
    StackOverflow {
        depth: usize,
    },

    // Statement structure
    InvalidAssignmentTarget,
    ControlOutsideLoop {
        keyword: String,
    },
    InvalidLiteral {
        text: String,
    },

    // Host
    Io {
        message: String,
    },

    /// Anything not worth its own category.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined { name } => write!(f, "undefined: {name}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }

            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::UnsupportedOperator { op, type_name } => {
                write!(f, "operator `{op}` is not supported for {type_name}")
            }
            Self::LengthMismatch { op, left, right } => {
                write!(f, "length mismatch in `{op}`: {left} bits vs {right} bits")
            }

            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),

            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::WrongArgCount {
                function,
                expected,
                got,
            } => write!(f, "{function} expects {expected} arguments, got {got}"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }

            Self::InvalidAssignmentTarget => write!(f, "invalid assignment target"),
            Self::ControlOutsideLoop { keyword } => {
                write!(f, "`{keyword}` outside of its enclosing construct")
            }
            Self::InvalidLiteral { text } => write!(f, "invalid literal: {text}"),

            Self::Io { message } => write!(f, "i/o error: {message}"),

            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// A runtime error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory-built errors.
    pub message: String,
}

impl EvalError {
    /// An uncategorized error.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        EvalError {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError { kind, message }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

impl From<BitSeqError> for EvalError {
    fn from(err: BitSeqError) -> Self {
        match err {
            BitSeqError::LengthMismatch { op, left, right } => {
                EvalError::from_kind(EvalErrorKind::LengthMismatch {
                    op: op.to_string(),
                    left,
                    right,
                })
            }
            BitSeqError::IndexOutOfBounds { index, len } => {
                EvalError::from_kind(EvalErrorKind::IndexOutOfBounds {
                    index: i64::try_from(index).unwrap_or(i64::MAX),
                    len,
                })
            }
            other @ (BitSeqError::OutOfRange { .. } | BitSeqError::EmptyPattern { .. }) => {
                EvalError::new(other.to_string())
            }
        }
    }
}

// Factory functions

/// Identifier with no binding in any visible scope.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Undefined {
        name: name.to_string(),
    })
}

/// Container access past the end.
#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

/// A value of the wrong runtime type.
#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn unsupported_operator(op: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperator {
        op: op.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

/// Builtin called with the wrong number of arguments; `expected` reads
/// like `"1"` or `"2 or 3"`.
#[cold]
pub fn wrong_arg_count(function: &str, expected: &str, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgCount {
        function: function.to_string(),
        expected: expected.to_string(),
        got,
    })
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn invalid_assignment_target() -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignmentTarget)
}

#[cold]
pub fn control_outside_loop(keyword: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ControlOutsideLoop {
        keyword: keyword.to_string(),
    })
}

#[cold]
pub fn invalid_literal(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidLiteral {
        text: text.to_string(),
    })
}

#[cold]
pub fn io_error(err: &std::io::Error) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Io {
        message: err.to_string(),
    })
}
