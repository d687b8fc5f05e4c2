//! Condition trees - the stored predicate language of policy rules
//!
//! Conditions are pure data (no executable code) so they can be stored,
//! versioned and diffed like any other record. The variant set is closed:
//! anything that does not fit it is rejected at deserialization or by
//! [`Condition::validate`] before it ever reaches the evaluator.

pub mod types;

pub use types::{Condition, NaryOp, UnaryOp};
