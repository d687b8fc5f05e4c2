//! Condition tree node types

use crate::error::{CoreError, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};

/// A node in a condition tree
///
/// Serialized form is externally tagged, e.g.
/// `{"path": "declared.wantsColor"}` or
/// `{"nary": {"op": "eq", "operands": [...]}}`. Unknown tags fail to
/// deserialize, which is what keeps raw imports from the admin surface out
/// of the evaluator until they fit this variant set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Literal value
    Literal(Value),

    /// Dot-addressed lookup into the decision context
    /// (e.g. `declared.wantsColor`, `inferred.style.tags`)
    Path(String),

    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Condition>,
    },

    /// N-ary operation over an ordered list of operands
    Nary {
        op: NaryOp,
        operands: Vec<Condition>,
    },
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Logical NOT
    Not,
}

/// N-ary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaryOp {
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Logical AND, short-circuit, vacuously true over zero operands
    And,
    /// Logical OR, short-circuit, vacuously false over zero operands
    Or,
    /// Membership test against an ordered list operand
    In,
}

impl NaryOp {
    /// Returns true if this is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            NaryOp::Eq | NaryOp::Ne | NaryOp::Gt | NaryOp::Ge | NaryOp::Lt | NaryOp::Le
        )
    }

    /// Returns true if this is a logical connective
    pub fn is_logical(&self) -> bool {
        matches!(self, NaryOp::And | NaryOp::Or)
    }

    /// Operator name as used in serialized trees and error messages
    pub fn name(&self) -> &'static str {
        match self {
            NaryOp::Eq => "eq",
            NaryOp::Ne => "ne",
            NaryOp::Gt => "gt",
            NaryOp::Ge => "ge",
            NaryOp::Lt => "lt",
            NaryOp::Le => "le",
            NaryOp::And => "and",
            NaryOp::Or => "or",
            NaryOp::In => "in",
        }
    }
}

impl Condition {
    /// Create a literal condition
    pub fn literal(value: impl Into<Value>) -> Self {
        Condition::Literal(value.into())
    }

    /// Create a context path reference
    pub fn path(path: impl Into<String>) -> Self {
        Condition::Path(path.into())
    }

    /// Create a logical NOT
    pub fn not(operand: Condition) -> Self {
        Condition::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    /// Create a conjunction over operands
    pub fn all(operands: Vec<Condition>) -> Self {
        Condition::Nary {
            op: NaryOp::And,
            operands,
        }
    }

    /// Create a disjunction over operands
    pub fn any(operands: Vec<Condition>) -> Self {
        Condition::Nary {
            op: NaryOp::Or,
            operands,
        }
    }

    /// Create a binary comparison
    pub fn compare(left: Condition, op: NaryOp, right: Condition) -> Self {
        Condition::Nary {
            op,
            operands: vec![left, right],
        }
    }

    /// Validate the tree's structure ahead of evaluation
    ///
    /// Comparison and membership operators take exactly two operands.
    /// Trees that fail validation must be quarantined at load time, not
    /// handed to the evaluator.
    pub fn validate(&self) -> Result<()> {
        match self {
            Condition::Literal(_) => Ok(()),
            Condition::Path(path) => {
                if path.is_empty() {
                    return Err(CoreError::MalformedCondition(
                        "empty context path".to_string(),
                    ));
                }
                Ok(())
            }
            Condition::Unary { operand, .. } => operand.validate(),
            Condition::Nary { op, operands } => {
                if (op.is_comparison() || *op == NaryOp::In) && operands.len() != 2 {
                    return Err(CoreError::MalformedCondition(format!(
                        "operator '{}' expects 2 operands, found {}",
                        op.name(),
                        operands.len()
                    )));
                }
                for operand in operands {
                    operand.validate()?;
                }
                Ok(())
            }
        }
    }
}
