//! Evaluation of AST nodes.
//!
//! Dispatch is on the command kind alone. Every compound command stops at
//! the first `Err` from a child and passes it up with `?`; only loops catch
//! `break`/`continue` and only calls catch `return`.

use carbon_ir::InstructionKind;
use carbon_patterns::{
    invalid_assignment_target, type_mismatch, undefined_variable, Command, CommandFlags,
    CommandKind, ControlAction, EvalResult, Node, ObjectMap, Value,
};

use super::Interpreter;
use crate::operators::evaluate_binary;
use crate::stack::ensure_sufficient_stack;
use crate::unary_operators::evaluate_unary;

impl Interpreter {
    pub(crate) fn eval(&mut self, node: &Node) -> EvalResult {
        match node {
            Node::Literal(value) => Ok(value.clone()),
            Node::Atom {
                kind: InstructionKind::Id,
                text,
            } => match self.symbols.resolve(text) {
                Some(value) => Ok(value.clone()),
                None => Err(undefined_variable(text).into()),
            },
            Node::Atom { kind, text } => {
                panic!("implementation error: {kind} atom `{text}` evaluated on its own")
            }
            Node::Command(command) => ensure_sufficient_stack(|| self.eval_scoped(command)),
        }
    }

    /// Open a scope around commands that carry `DOES_PUSH_STACK`.
    fn eval_scoped(&mut self, command: &Command) -> EvalResult {
        if !command.flags.contains(CommandFlags::DOES_PUSH_STACK) {
            return self.eval_command(command);
        }
        self.symbols.push();
        let result = self.eval_command(command);
        self.symbols.pop();
        result
    }

    fn eval_command(&mut self, command: &Command) -> EvalResult {
        let children = command.children.as_slice();
        match (command.kind, children) {
            (CommandKind::Binary(op), [lhs, rhs]) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                evaluate_binary(&lhs, &rhs, op)
            }
            (CommandKind::Unary(op), [operand]) => {
                let operand = self.eval(operand)?;
                evaluate_unary(op, &operand)
            }
            (CommandKind::LogicalAnd, [lhs, rhs]) => {
                let result = self.eval_condition(lhs)? && self.eval_condition(rhs)?;
                Ok(Value::Bit(result))
            }
            (CommandKind::LogicalOr, [lhs, rhs]) => {
                let result = self.eval_condition(lhs)? || self.eval_condition(rhs)?;
                Ok(Value::Bit(result))
            }
            (CommandKind::Assign, [target, value]) => self.eval_assign(target, value),
            (CommandKind::Local, [name]) => {
                self.declare_local(local_name(name));
                Ok(Value::None)
            }
            (CommandKind::Member, [object, field]) => {
                let object = self.eval(object)?;
                member(&object, field_name(field))
            }
            (CommandKind::Call, [callee, args @ ..]) => {
                let function = self.eval(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call_function(&function, &args)
            }
            (CommandKind::Array, items) => {
                let items = items
                    .iter()
                    .map(|item| self.eval(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(items))
            }
            (CommandKind::Object, entries) => {
                let mut fields = ObjectMap::default();
                for pair in entries.chunks_exact(2) {
                    let value = self.eval(&pair[1])?;
                    fields.insert(field_name(&pair[0]).to_string(), value);
                }
                Ok(Value::object(fields))
            }
            (CommandKind::Block, statements) => {
                for statement in statements {
                    self.eval(statement)?;
                }
                Ok(Value::None)
            }
            (CommandKind::If, [cond, then]) => {
                if self.eval_condition(cond)? {
                    self.eval(then)
                } else {
                    Ok(Value::None)
                }
            }
            (CommandKind::IfElse, [cond, then, otherwise]) => {
                if self.eval_condition(cond)? {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            (CommandKind::Loop, parts) => self.eval_loop(parts),
            (CommandKind::Return, []) => Err(ControlAction::Return(Value::None)),
            (CommandKind::Return, [value]) => Err(ControlAction::Return(self.eval(value)?)),
            (CommandKind::Break, []) => Err(ControlAction::Break),
            (CommandKind::Continue, []) => Err(ControlAction::Continue),
            (kind, children) => panic!(
                "implementation error: unhandled command {kind:?} with {} children",
                children.len()
            ),
        }
    }

    /// Conditions must be bits.
    fn eval_condition(&mut self, node: &Node) -> Result<bool, ControlAction> {
        let value = self.eval(node)?;
        value
            .as_bit()
            .ok_or_else(|| type_mismatch("bit", value.type_name()).into())
    }

    /// Loops by arity: `[cond]`, `[cond, body]`, `[cond, step, body]` or
    /// `[init, cond, step, body]`.
    fn eval_loop(&mut self, parts: &[Node]) -> EvalResult {
        let (init, cond, step, body) = match parts {
            [cond] => (None, cond, None, None),
            [cond, body] => (None, cond, None, Some(body)),
            [cond, step, body] => (None, cond, Some(step), Some(body)),
            [init, cond, step, body] => (Some(init), cond, Some(step), Some(body)),
            _ => panic!("implementation error: loop with {} parts", parts.len()),
        };
        if let Some(init) = init {
            self.eval(init)?;
        }
        while self.eval_condition(cond)? {
            if let Some(body) = body {
                match self.eval(body) {
                    Ok(_) | Err(ControlAction::Continue) => {}
                    Err(ControlAction::Break) => break,
                    Err(other) => return Err(other),
                }
            }
            if let Some(step) = step {
                self.eval(step)?;
            }
        }
        Ok(Value::None)
    }

    /// The right side resolves through the full scope chain even inside a
    /// `local` declaration.
    fn eval_assign(&mut self, target: &Node, value: &Node) -> EvalResult {
        let previous = self.symbols.set_local_mode(false);
        let value = self.eval(value);
        self.symbols.set_local_mode(previous);
        let value = value?;

        match target {
            Node::Atom {
                kind: InstructionKind::Id,
                text,
            } => self.symbols.assign(text, value),
            Node::Command(command) => match (command.kind, command.children.as_slice()) {
                (CommandKind::Local, [name]) => {
                    let previous = self.symbols.set_local_mode(true);
                    self.symbols.assign(local_name(name), value);
                    self.symbols.set_local_mode(previous);
                }
                (CommandKind::Member, [object, field]) => {
                    let object = self.eval(object)?;
                    let Value::Object(fields) = &object else {
                        return Err(type_mismatch("object", object.type_name()).into());
                    };
                    fields.write().insert(field_name(field).to_string(), value);
                }
                _ => return Err(invalid_assignment_target().into()),
            },
            Node::Atom { .. } | Node::Literal(_) => return Err(invalid_assignment_target().into()),
        }
        Ok(Value::None)
    }

    /// `local x;` binds `none` unless the innermost scope already has `x`.
    fn declare_local(&mut self, name: &str) {
        let previous = self.symbols.set_local_mode(true);
        if self.symbols.resolve(name).is_none() {
            self.symbols.assign(name, Value::None);
        }
        self.symbols.set_local_mode(previous);
    }
}

/// Field lookup is total: a missing field is `none`.
fn member(object: &Value, field: &str) -> EvalResult {
    match object {
        Value::Object(fields) => Ok(fields.read().get(field).cloned().unwrap_or(Value::None)),
        other => Err(type_mismatch("object", other.type_name()).into()),
    }
}

fn local_name(node: &Node) -> &str {
    match node.as_identifier() {
        Some(name) => name,
        None => panic!("implementation error: `local` applied to {node}"),
    }
}

fn field_name(node: &Node) -> &str {
    match node {
        Node::Atom { text, .. } => text,
        other => panic!("implementation error: field name {other} is not an atom"),
    }
}
