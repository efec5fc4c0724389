//! Infrastructure-level errors: the persistence boundary's failure taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Transport and adapter failures raised by a `ClassificationStore`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("classification not found: {0}")]
    NotFound(String),

    #[error("store I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid store data in {path}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
