//! Runtime values for the Carbon interpreter.
//!
//! # Sharing
//!
//! `Value::clone` is always cheap: scalars are copied and heap payloads are
//! reference counted through [`Heap`]. Strings and bit sequences are
//! immutable once built. Arrays and objects are shared mutable containers:
//! they sit behind a `parking_lot::RwLock`, and an in-place update made
//! through one alias is seen by all of them.
//!
//! ```text
//! let s = Value::string("hello");          // OK
//! let a = Value::array(vec![]);            // OK
//! let s = Value::Str(Heap::new(...));      // ERROR: Heap::new is pub(super)
//! ```

mod function;
mod heap;

use std::fmt;

use carbon_bits::BitSequence;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

pub use function::{FunctionValue, NativeFn, NativeFunction, UserFunction};
pub use heap::Heap;

/// Field storage of an object.
pub type ObjectMap = FxHashMap<String, Value>;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value; also the result of statements.
    None,
    Integer(i64),
    Float(f64),
    /// A single bit, the result of comparisons and the type of conditions.
    Bit(bool),
    Bits(Heap<BitSequence>),
    Str(Heap<String>),
    Array(Heap<RwLock<Vec<Value>>>),
    Object(Heap<RwLock<ObjectMap>>),
    Function(FunctionValue),
}

// Factory methods

impl Value {
    #[inline]
    pub fn bits(bits: BitSequence) -> Self {
        Value::Bits(Heap::new(bits))
    }

    #[inline]
    pub fn string(text: impl Into<String>) -> Self {
        Value::Str(Heap::new(text.into()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(RwLock::new(items)))
    }

    #[inline]
    pub fn object(fields: ObjectMap) -> Self {
        Value::Object(Heap::new(RwLock::new(fields)))
    }

    pub fn empty_object() -> Self {
        Self::object(ObjectMap::default())
    }

    pub fn native(name: &'static str, func: NativeFn) -> Self {
        Value::Function(FunctionValue::Native(NativeFunction { name, func }))
    }

    pub fn user_function(function: UserFunction) -> Self {
        Value::Function(FunctionValue::User(Heap::new(function)))
    }
}

// Inspection

impl Value {
    /// Name reported by the `type` builtin and in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bit(_) => "bit",
            Value::Bits(_) => "bits",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bit(&self) -> Option<bool> {
        match self {
            Value::Bit(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bits(&self) -> Option<&BitSequence> {
        match self {
            Value::Bits(b) => Some(b),
            _ => None,
        }
    }

    /// Whether both values are the same array or object allocation.
    pub fn same_container(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Heap::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Detach a container from its aliases: a fresh array or object holding
    /// the same elements. Other values are returned as is.
    pub fn shallow_copy(&self) -> Value {
        match self {
            Value::Array(items) => Value::array(items.read().clone()),
            Value::Object(fields) => Value::object(fields.read().clone()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Values of different types are never equal.
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other, &mut Vec::new())
    }
}

/// Container pairs currently being compared. Meeting a pair again means
/// both sides are cyclic in the same shape, so the pair counts as equal.
type Comparing = Vec<(*const (), *const ())>;

fn values_equal(a: &Value, b: &Value, comparing: &mut Comparing) -> bool {
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Bit(a), Value::Bit(b)) => a == b,
        (Value::Bits(a), Value::Bits(b)) => **a == **b,
        (Value::Str(a), Value::Str(b)) => **a == **b,
        (Value::Array(a), Value::Array(b)) => {
            if Heap::ptr_eq(a, b) {
                return true;
            }
            let pair = (a.addr(), b.addr());
            if comparing.contains(&pair) {
                return true;
            }
            comparing.push(pair);
            let (left, right) = (a.read(), b.read());
            let equal = left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(x, y)| values_equal(x, y, comparing));
            comparing.pop();
            equal
        }
        (Value::Object(a), Value::Object(b)) => {
            if Heap::ptr_eq(a, b) {
                return true;
            }
            let pair = (a.addr(), b.addr());
            if comparing.contains(&pair) {
                return true;
            }
            comparing.push(pair);
            let (left, right) = (a.read(), b.read());
            let equal = left.len() == right.len()
                && left.iter().all(|(key, x)| {
                    right
                        .get(key)
                        .is_some_and(|y| values_equal(x, y, comparing))
                });
            comparing.pop();
            equal
        }
        (Value::Function(a), Value::Function(b)) => a.same_function(b),
        _ => false,
    }
}

// Display

/// Containers currently being printed; a container that reaches itself
/// prints as `[...]` / `{...}` instead of recursing forever.
type Visiting = Vec<*const ()>;

fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let text = n.to_string();
    if n.is_finite() && !text.contains(['.', 'e', 'E']) {
        write!(f, "{text}.0")
    } else {
        f.write_str(&text)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, visiting: &mut Visiting) -> fmt::Result {
    match value {
        Value::None => f.write_str("none"),
        Value::Integer(n) => write!(f, "{n}"),
        Value::Float(n) => write_float(f, *n),
        Value::Bit(b) => write!(f, "{b}"),
        Value::Bits(bits) => write!(f, "b\"{}\"", &**bits),
        Value::Str(s) => f.write_str(s),
        Value::Function(func) => write!(f, "{func}"),
        Value::Array(items) => {
            if visiting.contains(&items.addr()) {
                return f.write_str("[...]");
            }
            visiting.push(items.addr());
            f.write_str("[")?;
            for (i, item) in items.read().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, visiting)?;
            }
            visiting.pop();
            f.write_str("]")
        }
        Value::Object(fields) => {
            if visiting.contains(&fields.addr()) {
                return f.write_str("{...}");
            }
            visiting.push(fields.addr());
            let guard = fields.read();
            let mut keys: Vec<&String> = guard.keys().collect();
            keys.sort();
            f.write_str("{")?;
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_value(f, &guard[key], visiting)?;
            }
            visiting.pop();
            f.write_str("}")
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::Float(n) => write!(f, "Float({n:?})"),
            Value::Bit(b) => write!(f, "Bit({b})"),
            Value::Bits(bits) => write!(f, "Bits({bits})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Array(_) => write!(f, "Array({self})"),
            Value::Object(_) => write!(f, "Object({self})"),
            Value::Function(func) => write!(f, "Function({func})"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bit(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<BitSequence> for Value {
    fn from(bits: BitSequence) -> Self {
        Value::bits(bits)
    }
}
