//! The AST assembled by the tree builder.
//!
//! A tree has three kinds of node: literals (already parsed into a
//! [`Value`]), atoms (identifiers, plus object keys and member names that
//! are never evaluated on their own) and commands. The command kind alone
//! decides how its children are evaluated.

use std::fmt;

use bitflags::bitflags;
use carbon_ir::{BinaryOp, InstructionKind, UnaryOp};

use crate::value::Value;

bitflags! {
    /// Per-command properties computed when the command is built.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u8 {
        /// Evaluating the command opens a new lexical scope.
        const DOES_PUSH_STACK = 1 << 0;
        /// The subtree makes no call and assigns only to `local` names.
        const IS_PURE = 1 << 1;
    }
}

/// What a command does with its children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// `[lhs, rhs]`, both always evaluated.
    Binary(BinaryOp),
    /// `[operand]`
    Unary(UnaryOp),
    /// `[lhs, rhs]`, rhs skipped when lhs is false.
    LogicalAnd,
    /// `[lhs, rhs]`, rhs skipped when lhs is true.
    LogicalOr,
    /// `[target, value]`
    Assign,
    /// `[identifier]`: the identifier binds in the innermost scope.
    Local,
    /// `[object, field-atom]`
    Member,
    /// `[callee, args..]`
    Call,
    /// `[items..]`
    Array,
    /// `[key-atom, value, key-atom, value, ..]`
    Object,
    /// `[statements..]`
    Block,
    /// `[cond, then]`
    If,
    /// `[cond, then, else]`
    IfElse,
    /// `[cond]`, `[cond, body]`, `[cond, step, body]` or
    /// `[init, cond, step, body]`
    Loop,
    /// `[]` or `[value]`
    Return,
    Break,
    Continue,
}

impl CommandKind {
    fn name(self) -> &'static str {
        match self {
            CommandKind::Binary(op) => op.as_symbol(),
            CommandKind::Unary(op) => op.as_symbol(),
            CommandKind::LogicalAnd => "&&",
            CommandKind::LogicalOr => "||",
            CommandKind::Assign => "=",
            CommandKind::Local => "local",
            CommandKind::Member => ".",
            CommandKind::Call => "call",
            CommandKind::Array => "array",
            CommandKind::Object => "object",
            CommandKind::Block => "block",
            CommandKind::If => "if",
            CommandKind::IfElse => "ifelse",
            CommandKind::Loop => "loop",
            CommandKind::Return => "return",
            CommandKind::Break => "break",
            CommandKind::Continue => "continue",
        }
    }
}

/// An interior node.
#[derive(Clone, Debug)]
pub struct Command {
    pub kind: CommandKind,
    pub children: Vec<Node>,
    pub flags: CommandFlags,
}

/// One AST node.
#[derive(Clone, Debug)]
pub enum Node {
    Literal(Value),
    Atom { kind: InstructionKind, text: String },
    Command(Command),
}

impl Node {
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Atom {
            kind: InstructionKind::Id,
            text: name.into(),
        }
    }

    /// Build a command, deriving its flags from the kind and children.
    pub fn command(kind: CommandKind, children: Vec<Node>) -> Self {
        let mut flags = CommandFlags::empty();
        if kind == CommandKind::Block {
            flags |= CommandFlags::DOES_PUSH_STACK;
        }
        let assigns_outward = kind == CommandKind::Assign
            && !matches!(children.first(), Some(Node::Command(c)) if c.kind == CommandKind::Local);
        if kind != CommandKind::Call && !assigns_outward && children.iter().all(Node::is_pure) {
            flags |= CommandFlags::IS_PURE;
        }
        Node::Command(Command {
            kind,
            children,
            flags,
        })
    }

    /// The identifier name, if this is an `ID` atom.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Node::Atom {
                kind: InstructionKind::Id,
                text,
            } => Some(text),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Node::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pure(&self) -> bool {
        match self {
            Node::Literal(_) | Node::Atom { .. } => true,
            Node::Command(command) => command.flags.contains(CommandFlags::IS_PURE),
        }
    }
}

impl fmt::Display for Node {
    /// S-expression form, e.g. `(+ 2 (* x 3))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(Value::Str(s)) => write!(f, "{:?}", &**s),
            Node::Literal(value) => write!(f, "{value}"),
            Node::Atom { text, .. } => f.write_str(text),
            Node::Command(command) => {
                write!(f, "({}", command.kind.name())?;
                for child in &command.children {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
