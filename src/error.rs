//! Error types for projlock.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for projlock operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum ProjlockError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// Another run already holds the project lock.
    ///
    /// The message is the full operator-facing diagnostic and is meant to be
    /// displayed verbatim.
    #[error("{0}")]
    AlreadyRunning(String),

    /// The semaphore store failed; exclusivity cannot be established.
    #[error("Semaphore store failure: {0}")]
    StoreError(String),

    /// The guarded command could not be started.
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl ProjlockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProjlockError::UserError(_) => exit_codes::USER_ERROR,
            ProjlockError::AlreadyRunning(_) => exit_codes::LOCK_FAILURE,
            ProjlockError::StoreError(_) => exit_codes::STORE_FAILURE,
            ProjlockError::CommandFailed(_) => exit_codes::COMMAND_FAILURE,
        }
    }

    /// Whether this error means the project is locked by another run.
    pub fn is_already_running(&self) -> bool {
        matches!(self, ProjlockError::AlreadyRunning(_))
    }
}

/// Result type alias for projlock operations.
pub type Result<T> = std::result::Result<T, ProjlockError>;
