// Central Error Types

use crate::domain::{StreamKind, EXIT_SPAWN_FAILURE, EXIT_WAIT_FAILURE};
use thiserror::Error;

/// Failure to run a command to completion
///
/// A child that exits with a non-zero code is NOT an error: it is reported
/// through the runner's report. These variants cover the cases where no exit
/// code could be observed.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("could not spawn command '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("could not pipe {stream} of command '{command}'")]
    PipeFailed { command: String, stream: StreamKind },

    #[error("wait failure - {command}: {reason}")]
    WaitFailed { command: String, reason: String },
}

impl RunError {
    /// Sentinel exit code reported for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::SpawnFailed { .. } | RunError::PipeFailed { .. } => EXIT_SPAWN_FAILURE,
            RunError::WaitFailed { .. } => EXIT_WAIT_FAILURE,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Result type alias using RunError
pub type Result<T> = std::result::Result<T, RunError>;
