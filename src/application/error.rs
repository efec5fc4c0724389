//! Application-level errors (wraps domain and store errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::StoreError;

/// Application errors wrap domain errors and add orchestration concerns.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("a structural mutation is already in flight")]
    Busy,

    #[error("{context}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Wrap a store failure with operation context.
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
