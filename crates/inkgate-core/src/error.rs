//! Error types for Inkgate Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    #[error("Rule '{0}' has decision ALLOW_WITH_WARNING but no warning_key")]
    MissingWarningKey(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
