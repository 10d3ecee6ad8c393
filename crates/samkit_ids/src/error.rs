//! Error types for identifier and ARN checks.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for identifier operations.
pub type IdResult<T> = Result<T, IdError>;

/// Reasons a synthesized logical id is rejected. Each is fatal to that id only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Logical id must not be empty")]
    Empty,

    #[error("Logical id '{id}' is {length} characters long, the maximum is {max}")]
    TooLong { id: String, length: usize, max: usize },

    #[error("Logical id '{0}' must be alphanumeric and start with a letter")]
    Malformed(String),

    #[error("Logical id '{id}' uses reserved prefix '{prefix}'")]
    ReservedPrefix { id: String, prefix: String },

    #[error("Logical id '{0}' is already in use in this pass")]
    Duplicate(String),
}

/// Reasons a fully-qualified resource name is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArnError {
    #[error("ARN must not be empty")]
    Empty,

    #[error("Malformed ARN '{arn}': {reason}")]
    Malformed { arn: String, reason: String },

    #[error("ARN '{arn}' uses unsupported partition '{partition}'")]
    UnsupportedPartition { arn: String, partition: String },

    #[error("ARN '{arn}' has {field} '{actual}', expected '{expected}'")]
    FieldMismatch {
        arn: String,
        field: &'static str,
        expected: String,
        actual: String,
    },
}

/// Errors that can occur in this crate.
#[derive(Error, Debug)]
pub enum IdError {
    #[error("Identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("ARN error: {0}")]
    Arn(#[from] ArnError),

    #[error("Invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
