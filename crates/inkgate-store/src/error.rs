//! Error types for the storage layer

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Rule id not found
    #[error("Rule not found: {0}")]
    RuleNotFound(u64),

    /// `rule_key` already taken within the scope
    #[error("Duplicate rule_key '{rule_key}' in scope {scope}")]
    DuplicateRuleKey { scope: String, rule_key: String },

    /// A concurrent writer moved the version head; retry against the new
    /// head or surface the conflict, never silently overwrite
    #[error("Version conflict for scope {scope}: expected head {expected:?}, found {found:?}")]
    VersionConflict {
        scope: String,
        expected: Option<u32>,
        found: Option<u32>,
    },

    /// Unrecoverable data-integrity fault (e.g. two active versions for
    /// one scope); reported loudly, never auto-corrected
    #[error("Data integrity fault: {0}")]
    Integrity(String),

    /// Rule failed validation ahead of storage
    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] inkgate_core::CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error (seed loader)
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error (when the postgres feature is enabled)
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
