//! Assembles the postfix instruction stream into statement trees.
//!
//! The builder keeps a value stack of finished subtrees interleaved with
//! BEGIN markers. Operators pop their operands and push the reduced node;
//! END instructions pop back to the matching marker and replace the run
//! with one composite node. `END_STATEMENT` at nesting depth 1 moves the
//! finished root into the pending statement list; deeper ones are no-ops,
//! since the enclosing block collects its statements at `BLOCKEND`.
//!
//! Arithmetic on two literals is folded as it is reduced. A fold that would
//! fail at run time (division by zero, overflow) is left alone so that the
//! error surfaces when the statement executes.
//!
//! A malformed stream (END without BEGIN, operand underflow) is a front-end
//! bug and panics. A literal whose text does not parse is a user error: a
//! `none` placeholder keeps the stream reducible, and the finished statement
//! is delivered as that error instead of a tree.

use carbon_ir::{BinaryOp, InstructionKind, UnaryOp};
use carbon_patterns::{CommandKind, EvalError, Node, UserFunction, Value};

use crate::literals::parse_atom;

/// Kinds of bracketed run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Marker {
    Call,
    Block,
    Array,
    Object,
    Function,
}

#[derive(Debug)]
enum Entry {
    Node(Node),
    Marker(Marker),
}

/// A completed top-level statement, or the literal error that spoiled it.
pub type Statement = Result<Node, EvalError>;

/// The instruction sink that builds statement trees.
pub struct TreeBuilder {
    stack: Vec<Entry>,
    depth: usize,
    statements: Vec<Statement>,
    /// First literal error of the statement being built.
    poisoned: Option<EvalError>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            stack: Vec::new(),
            depth: 1,
            statements: Vec::new(),
            poisoned: None,
        }
    }

    /// Current bracket nesting; 1 between statements.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a statement is partially assembled.
    pub fn is_mid_statement(&self) -> bool {
        self.depth > 1 || !self.stack.is_empty()
    }

    /// Completed statements not yet taken.
    pub fn pending(&self) -> usize {
        self.statements.len()
    }

    pub fn take_statements(&mut self) -> Vec<Statement> {
        std::mem::take(&mut self.statements)
    }

    /// Drop any partially built statement.
    pub fn discard_partial(&mut self) {
        self.stack.clear();
        self.depth = 1;
        self.poisoned = None;
    }

    /// Consume one instruction. `text` is ignored for bare kinds.
    pub fn push(&mut self, kind: InstructionKind, text: &str) {
        use InstructionKind as K;

        if let Some(op) = kind.binary_op() {
            let rhs = self.pop_node(kind);
            let lhs = self.pop_node(kind);
            let node = fold_binary(op, lhs, rhs);
            self.push_node(node);
            return;
        }
        if let Some(op) = kind.unary_op() {
            let operand = self.pop_node(kind);
            let node = fold_unary(op, operand);
            self.push_node(node);
            return;
        }

        match kind {
            K::Id => self.push_node(Node::identifier(text)),
            K::Str | K::Ustr | K::Xstr | K::Bstr | K::Num | K::Xnum | K::Bnum | K::Onum | K::Float => {
                let value = parse_atom(kind, text).unwrap_or_else(|err| {
                    self.poisoned.get_or_insert(err);
                    Value::None
                });
                self.push_node(Node::Literal(value));
            }
            K::True => self.push_node(Node::Literal(Value::Bit(true))),
            K::False => self.push_node(Node::Literal(Value::Bit(false))),
            K::None => self.push_node(Node::Literal(Value::None)),

            K::CallBegin => self.open(Marker::Call),
            K::BlockBegin => self.open(Marker::Block),
            K::ArrayBegin => self.open(Marker::Array),
            K::ObjectBegin => self.open(Marker::Object),
            K::FunctionBegin => self.open(Marker::Function),

            K::CallEnd => {
                let args = self.close(Marker::Call);
                let callee = self.pop_node(kind);
                let mut children = Vec::with_capacity(args.len() + 1);
                children.push(callee);
                children.extend(args);
                self.push_node(Node::command(CommandKind::Call, children));
            }
            K::BlockEnd => {
                let statements = self.close(Marker::Block);
                self.push_node(Node::command(CommandKind::Block, statements));
            }
            K::ArrayEnd => {
                let items = self.close(Marker::Array);
                self.push_node(Node::command(CommandKind::Array, items));
            }
            K::ObjectEnd => {
                let entries = self.close(Marker::Object);
                self.push_node(build_object(entries));
            }
            K::FunctionEnd => {
                let parts = self.close(Marker::Function);
                self.push_node(build_function(parts));
            }

            K::Land | K::Lor => {
                let rhs = self.pop_node(kind);
                let lhs = self.pop_node(kind);
                let command = if kind == K::Land {
                    CommandKind::LogicalAnd
                } else {
                    CommandKind::LogicalOr
                };
                self.push_node(Node::command(command, vec![lhs, rhs]));
            }
            K::Member => {
                let field = self.pop_node(kind);
                let object = self.pop_node(kind);
                self.push_node(Node::command(CommandKind::Member, vec![object, field]));
            }
            K::Assign => {
                let value = self.pop_node(kind);
                let target = self.pop_node(kind);
                self.push_node(Node::command(CommandKind::Assign, vec![target, value]));
            }
            K::Local => {
                let name = self.pop_node(kind);
                self.push_node(Node::command(CommandKind::Local, vec![name]));
            }
            K::If => {
                let children = self.pop_nodes(kind, 2);
                self.push_node(Node::command(CommandKind::If, children));
            }
            K::IfElse => {
                let children = self.pop_nodes(kind, 3);
                self.push_node(Node::command(CommandKind::IfElse, children));
            }
            K::Loop0 | K::Loop1 | K::Loop2 | K::Loop3 => {
                let arity = kind.loop_arity().unwrap_or(1);
                let children = self.pop_nodes(kind, arity);
                self.push_node(Node::command(CommandKind::Loop, children));
            }
            K::Return0 => self.push_node(Node::command(CommandKind::Return, Vec::new())),
            K::Return1 => {
                let value = self.pop_node(kind);
                self.push_node(Node::command(CommandKind::Return, vec![value]));
            }
            K::Break => self.push_node(Node::command(CommandKind::Break, Vec::new())),
            K::Continue => self.push_node(Node::command(CommandKind::Continue, Vec::new())),

            K::EndStatement => self.end_statement(),

            K::Add | K::Sub | K::Mul | K::Div | K::Mod | K::Eq | K::Ne | K::Lt | K::Gt | K::Le
            | K::Ge | K::Neg | K::Pos | K::Not => {
                panic!("implementation error: operator {kind} should have been reduced")
            }
        }
    }

    /// Shared by every path that completes a statement.
    fn end_statement(&mut self) {
        if self.depth > 1 {
            return;
        }
        match self.stack.pop() {
            Some(Entry::Node(root)) => {
                if !self.stack.is_empty() {
                    panic!(
                        "implementation error: {} dangling entries at end of statement",
                        self.stack.len()
                    );
                }
                tracing::trace!(statement = %root, "statement complete");
                let statement = match self.poisoned.take() {
                    Some(err) => Err(err),
                    None => Ok(root),
                };
                self.statements.push(statement);
            }
            Some(Entry::Marker(marker)) => {
                panic!("implementation error: unclosed {marker:?} at end of statement")
            }
            // an empty statement
            None => {}
        }
    }

    fn push_node(&mut self, node: Node) {
        self.stack.push(Entry::Node(node));
    }

    fn pop_node(&mut self, kind: InstructionKind) -> Node {
        match self.stack.pop() {
            Some(Entry::Node(node)) => node,
            Some(Entry::Marker(marker)) => {
                panic!("implementation error: {kind} reached {marker:?} marker")
            }
            None => panic!("implementation error: value stack underflow at {kind}"),
        }
    }

    /// Pop `count` nodes, returned in push order.
    fn pop_nodes(&mut self, kind: InstructionKind, count: usize) -> Vec<Node> {
        let mut nodes: Vec<Node> = (0..count).map(|_| self.pop_node(kind)).collect();
        nodes.reverse();
        nodes
    }

    fn open(&mut self, marker: Marker) {
        self.stack.push(Entry::Marker(marker));
        self.depth += 1;
    }

    /// Pop back to the matching marker, returning the nodes in push order.
    fn close(&mut self, expected: Marker) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            match self.stack.pop() {
                Some(Entry::Node(node)) => nodes.push(node),
                Some(Entry::Marker(marker)) if marker == expected => break,
                Some(Entry::Marker(marker)) => {
                    panic!("implementation error: {expected:?} end closes {marker:?}")
                }
                None => panic!("implementation error: {expected:?} end without begin"),
            }
        }
        self.depth -= 1;
        nodes.reverse();
        nodes
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_object(entries: Vec<Node>) -> Node {
    if entries.len() % 2 != 0 {
        panic!("implementation error: object literal with a key and no value");
    }
    let mut children = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        let key = match key {
            Node::Atom { .. } => key,
            Node::Literal(literal) => Node::Atom {
                kind: InstructionKind::Str,
                text: literal.to_string(),
            },
            Node::Command(_) => panic!("implementation error: computed object key"),
        };
        children.push(key);
        children.push(value);
    }
    Node::command(CommandKind::Object, children)
}

fn build_function(mut parts: Vec<Node>) -> Node {
    let Some(body) = parts.pop() else {
        panic!("implementation error: function without a body");
    };
    let params = parts
        .into_iter()
        .map(|param| match param.as_identifier() {
            Some(name) => name.to_string(),
            None => panic!("implementation error: function parameter {param} is not an identifier"),
        })
        .collect();
    Node::Literal(Value::user_function(UserFunction::new(params, body)))
}

fn fold_binary(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
    if op.is_arithmetic() {
        let folded = match (lhs.as_literal(), rhs.as_literal()) {
            (Some(Value::Integer(a)), Some(Value::Integer(b))) => {
                fold_integers(op, *a, *b).map(Value::Integer)
            }
            (Some(Value::Float(a)), Some(Value::Float(b))) => {
                fold_floats(op, *a, *b).map(Value::Float)
            }
            _ => None,
        };
        if let Some(value) = folded {
            return Node::Literal(value);
        }
    }
    Node::command(CommandKind::Binary(op), vec![lhs, rhs])
}

fn fold_integers(op: BinaryOp, a: i64, b: i64) -> Option<i64> {
    match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Mod => a.checked_rem(b),
        _ => None,
    }
}

fn fold_floats(op: BinaryOp, a: f64, b: f64) -> Option<f64> {
    match op {
        BinaryOp::Add => Some(a + b),
        BinaryOp::Sub => Some(a - b),
        BinaryOp::Mul => Some(a * b),
        BinaryOp::Div | BinaryOp::Mod if b == 0.0 => None,
        BinaryOp::Div => Some(a / b),
        BinaryOp::Mod => Some(a % b),
        _ => None,
    }
}

fn fold_unary(op: UnaryOp, operand: Node) -> Node {
    let folded = match (op, operand.as_literal()) {
        (UnaryOp::Neg, Some(Value::Integer(n))) => n.checked_neg().map(Value::Integer),
        (UnaryOp::Neg, Some(Value::Float(n))) => Some(Value::Float(-n)),
        (UnaryOp::Pos, Some(value @ (Value::Integer(_) | Value::Float(_)))) => Some(value.clone()),
        _ => None,
    };
    match folded {
        Some(value) => Node::Literal(value),
        None => Node::command(CommandKind::Unary(op), vec![operand]),
    }
}
