//! Evaluation error types

use thiserror::Error;

/// Structural evaluation failure
///
/// These only arise from malformed trees (author/configuration errors),
/// never from context data: the resolver treats an `Err` as a non-match,
/// skips the rule and reports a configuration warning. Value-level
/// mismatches (absent paths, incomparable types) are not errors and
/// evaluate to `false` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("operator '{op}' expects {expected} operands, found {found}")]
    Arity {
        op: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("expected a boolean node, found {0} literal")]
    NonBooleanLiteral(&'static str),
}

pub type Result<T> = std::result::Result<T, EvalError>;
