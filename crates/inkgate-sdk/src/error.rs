//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Storage layer error
    #[error("Store error: {0}")]
    StoreError(#[from] inkgate_store::StoreError),

    /// Core validation error
    #[error("Validation error: {0}")]
    ValidationError(#[from] inkgate_core::CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic SDK error
    #[error("SDK error: {0}")]
    GenericError(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
