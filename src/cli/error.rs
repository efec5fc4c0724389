//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::StoreError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    App(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::App(e) => match e {
                ApplicationError::Busy => crate::exitcode::TEMPFAIL,
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Store { source, .. } => match source {
                    StoreError::NotFound(_) => crate::exitcode::DATAERR,
                    StoreError::Io { .. } => crate::exitcode::IOERR,
                    StoreError::Format { .. } => crate::exitcode::DATAERR,
                    StoreError::Unavailable(_) => crate::exitcode::UNAVAILABLE,
                },
            },
        }
    }
}
