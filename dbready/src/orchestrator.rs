//! High-level entry points tying together resolution, probing, status
//! evaluation, and the migration runner.
//!
//! Deployment scripts and container entrypoints talk to this module; the
//! lower-level pieces remain available for callers that need finer control.

use std::fmt;
use std::time::Duration;

use crate::database::{probe, ConnectionConfig, ConnectionProfile, Database};
use crate::error::{Error, Result};
use crate::operations::{apply_pending, evaluate, revert_last, ApplyReport, StatusReport};
use crate::revision::RevisionChain;

/// Outcome of a check-only run, mapped onto the automation contract.
///
/// Automation cares about exactly one bit: may the application start now?
/// [`CheckOutcome::exit_code`] renders that bit; the variants carry the
/// detail humans read.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The schema is at head; the application may start.
    UpToDate,
    /// These revisions are still pending; run migrations first.
    Pending(Vec<String>),
    /// The database did not answer; carries the error text.
    Unreachable(String),
}

impl CheckOutcome {
    /// Exit code under the automation contract: 0 means safe to start.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::UpToDate => 0,
            Self::Pending(_) | Self::Unreachable(_) => 1,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => write!(f, "schema is up to date"),
            Self::Pending(ids) => {
                write!(f, "{} revision(s) pending: {}", ids.len(), ids.join(", "))
            }
            Self::Unreachable(error) => write!(f, "database is unreachable: {error}"),
        }
    }
}

/// Ties a resolved connection to a revision chain and exposes the
/// lifecycle operations deployment tooling needs.
#[derive(Debug)]
pub struct Orchestrator {
    profile: ConnectionProfile,
    chain: RevisionChain,
}

impl Orchestrator {
    /// Creates an orchestrator from a resolved profile and a chain.
    #[must_use]
    pub fn new(profile: ConnectionProfile, chain: RevisionChain) -> Self {
        Self { profile, chain }
    }

    /// Builds an orchestrator from `DBREADY_DATABASE_URL` and the built-in
    /// revision chain.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the variable is unset or the URL
    /// does not resolve.
    pub fn from_env() -> Result<Self> {
        let profile = ConnectionConfig::from_env()?.resolve()?;
        Ok(Self::new(profile, RevisionChain::builtin()))
    }

    /// Returns the revision chain this orchestrator operates on.
    #[must_use]
    pub fn chain(&self) -> &RevisionChain {
        &self.chain
    }

    /// Returns the resolved connection profile.
    #[must_use]
    pub fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    /// Evaluates migration status.
    ///
    /// A connection failure is part of the answer, not an error: it yields
    /// an unreachable report.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CorruptLedger`] or a database error from
    /// reading the ledger once connected.
    pub fn status(&self) -> Result<StatusReport> {
        let mut db = match Database::connect(&self.profile) {
            Ok(db) => db,
            Err(error) => {
                log::warn!("database at {} did not answer: {error}", self.profile);
                return Ok(StatusReport::unreachable(&self.chain, error.to_string()));
            }
        };
        evaluate(&mut db, &self.chain)
    }

    /// Applies all pending revisions.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the database does not answer, or any
    /// error from [`apply_pending`].
    pub fn apply(&self) -> Result<ApplyReport> {
        let mut db = Database::connect(&self.profile)?;
        apply_pending(&mut db, &self.chain)
    }

    /// Waits for the database to become ready, then applies all pending
    /// revisions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unreachable`] or [`crate::Error::AuthFailure`]
    /// from the wait, or any error from [`apply_pending`].
    pub fn apply_with_wait(&self, timeout: Duration, poll_interval: Duration) -> Result<ApplyReport> {
        probe::wait_until_ready(&self.profile, timeout, poll_interval)?;
        self.apply()
    }

    /// Reverts the most recently applied revision, if any.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the database does not answer, or any
    /// error from [`revert_last`].
    pub fn revert_last(&self) -> Result<Option<String>> {
        let mut db = Database::connect(&self.profile)?;
        revert_last(&mut db, &self.chain)
    }

    /// Waits for the database to become ready, then answers the gating
    /// question without mutating anything.
    ///
    /// A wait that ends in timeout or a fatal rejection is still an answer
    /// for the caller: it maps to [`CheckOutcome::Unreachable`] rather than
    /// an error, so the exit-code contract holds with and without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CorruptLedger`] or a database error from
    /// reading the ledger once connected.
    pub fn check_with_wait(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<CheckOutcome> {
        match probe::wait_until_ready(&self.profile, timeout, poll_interval) {
            Ok(()) => self.check_only(),
            Err(error @ (Error::Unreachable { .. } | Error::AuthFailure { .. })) => {
                Ok(CheckOutcome::Unreachable(error.to_string()))
            }
            Err(other) => Err(other),
        }
    }

    /// Answers the gating question without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CorruptLedger`] or a database error from
    /// reading the ledger once connected. An unreachable database is a
    /// [`CheckOutcome`], not an error.
    pub fn check_only(&self) -> Result<CheckOutcome> {
        let report = self.status()?;
        if let Some(error) = report.error {
            return Ok(CheckOutcome::Unreachable(error));
        }
        if report.pending.is_empty() {
            Ok(CheckOutcome::UpToDate)
        } else {
            Ok(CheckOutcome::Pending(report.pending))
        }
    }
}
