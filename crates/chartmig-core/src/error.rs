//! Error types for the rewriter

use thiserror::Error;

/// Per-file migration error
///
/// Detection errors leave the file untouched; the driver reports them and
/// moves on to the next candidate.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("top-level metadata.name not found for Deployment")]
    BaseNameNotFound,

    #[error("metadata.name is already templated: {value}")]
    AlreadyTemplated { value: String },
}

/// Result type for migration operations
pub type Result<T> = std::result::Result<T, RewriteError>;
