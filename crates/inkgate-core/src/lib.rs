//! Inkgate Core - Core types and definitions for the Inkgate booking policy engine
//!
//! This crate provides the fundamental types used across the Inkgate ecosystem:
//! - Value types for runtime data
//! - Condition tree definitions (the stored rule predicates)
//! - Rule, scope and decision types
//! - Versioned policy settings
//! - Error types

pub mod condition;
pub mod context;
pub mod decision;
pub mod error;
pub mod policy;
pub mod rule;
pub mod types;
pub mod warning;

// Re-export commonly used types
pub use condition::{Condition, NaryOp, UnaryOp};
pub use context::DecisionContext;
pub use decision::{Decision, DecisionResult, WarningNotice, NO_RULE_MATCHED};
pub use error::CoreError;
pub use policy::{PolicySettings, SettingsPayload};
pub use rule::{PolicyRule, RuleAction, Scope, ScopeLevel, ScopeSelector};
pub use types::Value;
pub use warning::{Severity, WarningTemplate};
