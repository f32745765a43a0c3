//! The store seam between orchestration logic and the database driver.
//!
//! The migration runner and status evaluator are written against
//! [`SchemaStore`] rather than a concrete client, so their ordering,
//! halt-on-failure, and idempotent-resume behavior can be exercised with an
//! in-memory implementation in tests. The production implementation is
//! [`crate::Database`].

use crate::error::Result;
use crate::revision::Revision;

/// Outcome of attempting to apply a single revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The revision's change unit and ledger entry committed together.
    Applied,
    /// A concurrent runner committed this revision first; nothing was
    /// changed by this attempt.
    AlreadyApplied,
}

/// Transactional primitives over the revision ledger and schema.
///
/// Implementations must uphold the atomicity contract: a revision's change
/// unit and its ledger entry become durable together or not at all, and a
/// ledger uniqueness violation is reported as
/// [`ApplyOutcome::AlreadyApplied`], never as an error.
pub trait SchemaStore {
    /// Reads the most recently applied revision id.
    ///
    /// Returns `None` both when the ledger table does not exist and when it
    /// is empty; callers cannot distinguish the two (both mean "never
    /// initialized").
    ///
    /// # Errors
    ///
    /// Returns an error on any database failure other than a missing
    /// ledger table.
    fn current_revision(&mut self) -> Result<Option<String>>;

    /// Applies one revision inside a single transaction: ledger insert plus
    /// forward-change unit, committed together.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RevisionApply`] carrying the revision id if
    /// the change unit or ledger write fails; the transaction is rolled
    /// back and nothing is recorded.
    fn apply_revision(&mut self, revision: &Revision) -> Result<ApplyOutcome>;

    /// Reverts one revision inside a single transaction: reverse-change
    /// unit plus removal of its ledger entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IrreversibleRevision`] if the revision has
    /// no reverse unit, or [`crate::Error::RevisionApply`] if executing it
    /// fails.
    fn revert_revision(&mut self, revision: &Revision) -> Result<()>;
}
