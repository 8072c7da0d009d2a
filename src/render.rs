//! Renders a parsed template against a context.

use std::cmp::Ordering;

use crate::ast::{Cond, Expr, ExprItem, ForLoop, IfElse, Node, Op, Operand, Scope, Template};
use crate::error::RenderError;
use crate::value::{Context, Value};

/// Render a template using the provided context.
///
/// The context is mutated while `for` loops shadow their loop variable and
/// holds exactly its original entries when this function returns, whether
/// rendering succeeded or failed. On failure no partial output is produced.
pub fn render(template: &Template, context: &mut Context) -> Result<String, RenderError> {
    let mut renderer = Renderer {
        context,
        buf: String::new(),
    };
    renderer.render_scope(&template.scope)?;
    Ok(renderer.buf)
}

/// A tree-walking renderer owning the output buffer for one render.
struct Renderer<'render> {
    context: &'render mut Context,
    buf: String,
}

impl Renderer<'_> {
    fn render_scope(&mut self, scope: &Scope) -> Result<(), RenderError> {
        for node in &scope.nodes {
            self.render_node(node)?;
        }
        Ok(())
    }

    fn render_node(&mut self, node: &Node) -> Result<(), RenderError> {
        match node {
            Node::Text(text) => self.buf.push_str(text),
            Node::Var(name) => {
                let value = self.lookup(name)?;
                self.buf.push_str(&value.to_string());
            }
            Node::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                self.buf.push_str(&value.to_string());
            }
            Node::IfElse(stmt) => self.render_if(stmt)?,
            Node::ForLoop(stmt) => self.render_for(stmt)?,
        }
        Ok(())
    }

    /// Renders the first branch whose condition holds, or the else branch.
    fn render_if(&mut self, stmt: &IfElse) -> Result<(), RenderError> {
        if self.eval_cond(&stmt.cond)? {
            return self.render_scope(&stmt.then_branch);
        }
        for branch in &stmt.elif_branches {
            if self.eval_cond(&branch.cond)? {
                return self.render_scope(&branch.body);
            }
        }
        if let Some(else_branch) = &stmt.else_branch {
            return self.render_scope(else_branch);
        }
        Ok(())
    }

    /// Iterates a list, shadowing the loop variable for each element.
    ///
    /// Any prior binding of the loop variable is restored on exit, and a
    /// fresh binding removed, even when the body fails to render.
    fn render_for(&mut self, stmt: &ForLoop) -> Result<(), RenderError> {
        let items = match self.context.get(&stmt.iterable) {
            Some(Value::List(items)) => items.clone(),
            Some(value) => {
                return Err(RenderError::NotAList {
                    name: stmt.iterable.clone(),
                    found: value.human(),
                });
            }
            None => return Err(RenderError::IteratorNotFound(stmt.iterable.clone())),
        };

        let shadowed = self.context.remove(&stmt.iteratee);
        let mut result = Ok(());
        for item in items {
            self.context.insert(stmt.iteratee.clone(), item);
            if let Err(err) = self.render_scope(&stmt.body) {
                result = Err(err);
                break;
            }
        }
        match shadowed {
            Some(value) => self.context.insert(stmt.iteratee.clone(), value),
            None => self.context.remove(&stmt.iteratee),
        };
        result
    }

    /// A bare variable condition must resolve to a boolean; an expression
    /// condition accepts any value and is tested for truthiness.
    fn eval_cond(&self, cond: &Cond) -> Result<bool, RenderError> {
        match cond {
            Cond::Var(name) => match self.lookup(name)? {
                Value::Bool(b) => Ok(*b),
                _ => Err(RenderError::NotABool(name.clone())),
            },
            Cond::Expr(expr) => Ok(self.eval_expr(expr)?.is_truthy()),
        }
    }

    /// Evaluates a flat expression with a two-stack shunting-yard pass.
    ///
    /// Operands evaluate in source order. A pending `!` applies to its
    /// operand as soon as the operand is pushed. A binary operator first
    /// applies every stacked operator of strictly higher precedence.
    fn eval_expr(&self, expr: &Expr) -> Result<Value, RenderError> {
        let mut operands: Vec<Value> = Vec::new();
        let mut operators: Vec<Op> = Vec::new();

        for item in &expr.items {
            match item {
                ExprItem::Operand(operand) => {
                    operands.push(self.eval_operand(operand)?);
                    if operators.last() == Some(&Op::Not) {
                        operators.pop();
                        apply_op(Op::Not, &mut operands)?;
                    }
                }
                ExprItem::Op(Op::Not) => operators.push(Op::Not),
                ExprItem::Op(op) => {
                    while matches!(
                        operators.last(),
                        Some(top) if top.precedence() > op.precedence()
                    ) {
                        match operators.pop() {
                            Some(top) => apply_op(top, &mut operands)?,
                            None => break,
                        }
                    }
                    operators.push(*op);
                }
            }
        }

        while let Some(op) = operators.pop() {
            apply_op(op, &mut operands)?;
        }

        if operands.len() != 1 {
            return Err(RenderError::UnevaluatedOperands(operands.len()));
        }
        operands.pop().ok_or(RenderError::NotEnoughOperands)
    }

    fn eval_operand(&self, operand: &Operand) -> Result<Value, RenderError> {
        match operand {
            Operand::Var(name) => self.lookup(name).cloned(),
            Operand::Index { name, key } => match self.lookup(name)? {
                Value::Map(map) => map.get(key).cloned().ok_or_else(|| RenderError::KeyNotFound {
                    name: name.clone(),
                    key: key.clone(),
                }),
                value => Err(RenderError::CannotIndex {
                    name: name.clone(),
                    key: key.clone(),
                    found: value.human(),
                }),
            },
            Operand::Str(s) => Ok(Value::String(s.clone())),
            Operand::Num(lexeme) => parse_number(lexeme),
            Operand::Group(expr) => self.eval_expr(expr),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value, RenderError> {
        self.context
            .get(name)
            .ok_or_else(|| RenderError::VariableNotFound(name.to_owned()))
    }
}

/// Pops the operands for `op`, applies it, and pushes the result.
fn apply_op(op: Op, operands: &mut Vec<Value>) -> Result<(), RenderError> {
    if op == Op::Not {
        let value = operands.pop().ok_or(RenderError::NotEnoughOperands)?;
        operands.push(Value::Bool(!value.is_truthy()));
        return Ok(());
    }

    let right = operands.pop().ok_or(RenderError::NotEnoughOperands)?;
    let left = operands.pop().ok_or(RenderError::NotEnoughOperands)?;
    let result = match op {
        // `&&` and `||` select one of their operands, not a boolean
        Op::And if left.is_truthy() => right,
        Op::And => left,
        Op::Or if left.is_truthy() => left,
        Op::Or => right,
        // `??` selects the left operand unless it is none
        Op::Coalesce if matches!(left, Value::None) => right,
        Op::Coalesce => left,
        Op::Eq => Value::Bool(left.compare(&right) == Ordering::Equal),
        Op::Ne => Value::Bool(left.compare(&right) != Ordering::Equal),
        Op::Gt => Value::Bool(left.compare(&right) == Ordering::Greater),
        Op::Lt => Value::Bool(left.compare(&right) == Ordering::Less),
        Op::Ge => Value::Bool(left.compare(&right) != Ordering::Less),
        Op::Le => Value::Bool(left.compare(&right) != Ordering::Greater),
        Op::Not => unreachable!(),
    };
    operands.push(result);
    Ok(())
}

/// Integer lexemes become integers, fractional ones floats.
fn parse_number(lexeme: &str) -> Result<Value, RenderError> {
    if let Ok(int) = lexeme.parse::<i64>() {
        return Ok(Value::Integer(int));
    }
    match lexeme.parse::<f64>() {
        Ok(float) => Ok(Value::Float(float)),
        Err(_) => Err(RenderError::InvalidNumber(lexeme.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_integer_vs_float() {
        assert_eq!(parse_number("18").unwrap(), Value::Integer(18));
        assert_eq!(parse_number("8.5").unwrap(), Value::Float(8.5));
        assert_eq!(
            parse_number("8.5.5").unwrap_err(),
            RenderError::InvalidNumber("8.5.5".to_owned())
        );
    }

    #[test]
    fn apply_not_uses_truthiness() {
        let mut operands = vec![Value::from("text")];
        apply_op(Op::Not, &mut operands).unwrap();
        assert_eq!(operands, [Value::Bool(false)]);

        let mut operands = vec![Value::None];
        apply_op(Op::Not, &mut operands).unwrap();
        assert_eq!(operands, [Value::Bool(true)]);
    }

    #[test]
    fn apply_op_on_empty_stack_errors() {
        let mut operands = Vec::new();
        assert_eq!(
            apply_op(Op::And, &mut operands).unwrap_err(),
            RenderError::NotEnoughOperands
        );
    }
}
