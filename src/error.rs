//! Error types for the compiler

use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Fatal compiler errors.
///
/// Recoverable findings (skipped entries, unknown types) are not errors;
/// they accumulate as [`crate::report::Warning`]s and never abort a run.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Required container missing from source document: {container}")]
    MissingContainer { container: &'static str },

    #[error("{entity}.{field} references undeclared entity {target}")]
    UnknownTarget {
        entity: String,
        field: String,
        target: String,
    },

    #[error("Invalid source document: {0}")]
    InvalidDocument(String),

    #[error("Strict import: {0} malformed entries were skipped")]
    StrictImport(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
