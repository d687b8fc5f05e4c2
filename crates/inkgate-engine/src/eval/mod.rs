//! Condition evaluator
//!
//! `evaluate(tree, context) -> bool` is deterministic, side-effect free
//! and total for well-formed trees. Structural malformation (wrong arity,
//! a non-boolean literal where a boolean is required) is the only `Err`
//! case; the caller skips the rule and reports it as a configuration
//! warning rather than aborting resolution.

mod compare;

use crate::error::{EvalError, Result};
use compare::compare_values;
use inkgate_core::{Condition, DecisionContext, NaryOp, UnaryOp, Value};

/// Evaluate a condition tree against a decision context
pub fn evaluate(condition: &Condition, ctx: &DecisionContext) -> Result<bool> {
    match condition {
        Condition::Literal(value) => match value {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::NonBooleanLiteral(other.type_name())),
        },

        // Context data is schema-agnostic: a path that resolves to
        // anything but a boolean is a non-match, not a config error.
        Condition::Path(path) => match ctx.resolve(path) {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => {
                tracing::debug!(
                    path = path.as_str(),
                    found = other.type_name(),
                    "non-boolean context value used as condition, not a match"
                );
                Ok(false)
            }
        },

        Condition::Unary { op, operand } => match op {
            UnaryOp::Not => Ok(!evaluate(operand, ctx)?),
        },

        Condition::Nary { op, operands } => match op {
            NaryOp::And => {
                for operand in operands {
                    if !evaluate(operand, ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            NaryOp::Or => {
                for operand in operands {
                    if evaluate(operand, ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => {
                if operands.len() != 2 {
                    return Err(EvalError::Arity {
                        op: op.name(),
                        expected: 2,
                        found: operands.len(),
                    });
                }
                let left = eval_operand(&operands[0], ctx)?;
                let right = eval_operand(&operands[1], ctx)?;
                Ok(compare_values(&left, *op, &right))
            }
        },
    }
}

/// Evaluate a node in operand position, producing a value
fn eval_operand(condition: &Condition, ctx: &DecisionContext) -> Result<Value> {
    match condition {
        Condition::Literal(value) => Ok(value.clone()),
        Condition::Path(path) => Ok(ctx.resolve(path)),
        // A nested operator node used as an operand contributes its truth value
        Condition::Unary { .. } | Condition::Nary { .. } => {
            Ok(Value::Bool(evaluate(condition, ctx)?))
        }
    }
}
