//! Error types for the SVM model core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Allocation failed for {0} support vectors")]
    AllocationError(usize),

    #[error("Index {index} out of range for {len} entries")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Precondition failed: {0}")]
    PreconditionError(String),

    #[error("Shape mismatch: expected {expected} entries, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("error in svm file, line nr:{line}")]
    FormatError { line: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SVMError>;
