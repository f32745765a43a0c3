//! CLI-specific error types with exit codes.
//!
//! Deployment automation consumes exactly one bit from this binary: exit
//! code 0 means the database is ready and at the expected schema revision,
//! anything else means it is not. Every failure therefore maps to exit
//! code 1; the variants exist for human-readable messages, not for exit
//! code fan-out.

use std::fmt;

use dbready::Error as LibError;

/// CLI-specific error type.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Configuration error.
    Config(String),

    /// The readiness check failed: unreachable database or pending
    /// revisions.
    NotReady(String),
}

impl CliError {
    /// Get the exit code for this error. Always 1: the contract with
    /// automation is a single go/no-go bit.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::NotReady(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}
