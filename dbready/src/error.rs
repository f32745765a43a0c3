//! Error types for the dbready library.
//!
//! This module provides the error hierarchy for all readiness and migration
//! operations, using `thiserror` for ergonomic error handling. The taxonomy
//! separates failures that are worth retrying (the database is temporarily
//! unreachable) from failures that retrying cannot fix (bad credentials,
//! malformed configuration, a ledger that references unknown revisions).

use thiserror::Error;

/// Result type alias for operations that may fail with a dbready error.
///
/// # Examples
///
/// ```
/// use dbready::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the dbready library.
///
/// This enum encompasses all failure conditions that can occur while probing
/// the database, evaluating migration status, or applying revisions.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection string is malformed or uses an unsupported scheme.
    ///
    /// Fatal: retrying cannot fix a bad configuration value.
    #[error("configuration error: {message}")]
    Config {
        /// A description of the configuration problem.
        message: String,
    },

    /// The database did not become reachable within the wait budget.
    ///
    /// Carries the last transient connection error observed for diagnostics.
    #[error("database unreachable after {waited_secs}s: {last_error}")]
    Unreachable {
        /// Seconds of wall-clock time spent waiting.
        waited_secs: u64,
        /// Text of the last transient error observed.
        last_error: String,
    },

    /// The database rejected the connection in a way that retrying cannot
    /// help: bad credentials or a target database that does not exist.
    #[error("database rejected the connection: {message}")]
    AuthFailure {
        /// Text of the rejection reported by the server.
        message: String,
    },

    /// The revision ledger references a revision unknown to the running
    /// code, signaling a version skew between deployed code and schema.
    #[error("ledger references unknown revision '{revision_id}': deployed code and schema are out of sync")]
    CorruptLedger {
        /// The revision id recorded in the ledger but absent from the chain.
        revision_id: String,
    },

    /// A specific revision's change unit failed to execute.
    ///
    /// All revisions committed before this one remain applied; re-running
    /// the migration resumes after the last committed revision.
    #[error("revision '{id}' failed: {source}")]
    RevisionApply {
        /// The id of the revision that failed.
        id: String,
        /// The underlying database error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A revert was requested for a revision that has no reverse unit.
    #[error("revision '{id}' has no down section and cannot be reverted")]
    IrreversibleRevision {
        /// The id of the irreversible revision.
        id: String,
    },

    /// The statically defined revision chain is not a single linear history.
    #[error("invalid revision chain: {message}")]
    ChainInvalid {
        /// A description of the structural problem.
        message: String,
    },

    /// A database error occurred outside of a revision's change unit.
    #[error("database error: {0}")]
    Database(#[from] postgres::Error),

    /// An I/O error occurred (revision files, scaffolding).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the error belongs to the fatal connection class for which
    /// the readiness prober must not retry.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbready::Error;
    ///
    /// let err = Error::AuthFailure { message: "password authentication failed".into() };
    /// assert!(err.is_fatal_connect());
    /// ```
    #[must_use]
    pub fn is_fatal_connect(&self) -> bool {
        matches!(self, Self::AuthFailure { .. } | Self::Config { .. })
    }

    /// Check if the error indicates code/schema version skew.
    #[must_use]
    pub fn is_corrupt_ledger(&self) -> bool {
        matches!(self, Self::CorruptLedger { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::Config {
            message: "missing scheme".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("configuration error"));
        assert!(display.contains("missing scheme"));
    }

    #[test]
    fn test_unreachable_error_display() {
        let err = Error::Unreachable {
            waited_secs: 30,
            last_error: "connection refused".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("unreachable after 30s"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_corrupt_ledger_display() {
        let err = Error::CorruptLedger {
            revision_id: "deadbeef".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("deadbeef"));
        assert!(display.contains("out of sync"));
    }

    #[test]
    fn test_revision_apply_carries_id() {
        let err = Error::RevisionApply {
            id: "20250602_add_proxies".to_string(),
            source: "syntax error at or near \"TABEL\"".to_string().into(),
        };
        let display = format!("{err}");
        assert!(display.contains("20250602_add_proxies"));
        assert!(display.contains("TABEL"));
    }

    #[test]
    fn test_fatal_connect_classification() {
        assert!(Error::AuthFailure {
            message: "x".into()
        }
        .is_fatal_connect());
        assert!(Error::Config {
            message: "x".into()
        }
        .is_fatal_connect());
        assert!(!Error::Unreachable {
            waited_secs: 1,
            last_error: "x".into()
        }
        .is_fatal_connect());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
    }
}
