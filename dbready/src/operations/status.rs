//! Migration status evaluation.
//!
//! Compares the ledger's current revision against the statically known
//! chain and produces a [`StatusReport`]. Reports are computed fresh on
//! every call; database state can change between calls.

use serde::Serialize;

use crate::database::SchemaStore;
use crate::error::Result;
use crate::revision::RevisionChain;

/// Snapshot of where the schema stands relative to the chain head.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Whether the database answered at all. When false, `pending` is
    /// empty and must not be trusted; check `error` instead.
    pub reachable: bool,
    /// The most recently applied revision, or `None` for a never-initialized
    /// database.
    pub current: Option<String>,
    /// The chain head: the fully up-to-date target state.
    pub head: String,
    /// Ids of revisions still to apply, in chain order.
    pub pending: Vec<String>,
    /// Connection error text when `reachable` is false.
    pub error: Option<String>,
}

impl StatusReport {
    /// Builds the report for a database that did not answer.
    #[must_use]
    pub fn unreachable(chain: &RevisionChain, error: String) -> Self {
        Self {
            reachable: false,
            current: None,
            head: chain.head().map(|r| r.id.clone()).unwrap_or_default(),
            pending: Vec::new(),
            error: Some(error),
        }
    }

    /// True when the database answered and no revisions are pending.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.reachable && self.error.is_none() && self.pending.is_empty()
    }

    /// True when migrations must run before the application may start.
    ///
    /// An unreachable database counts as needing migration: the caller
    /// cannot prove otherwise.
    #[must_use]
    pub fn needs_migration(&self) -> bool {
        !self.is_up_to_date()
    }
}

/// Evaluates the current migration status against the chain.
///
/// # Errors
///
/// Returns [`crate::Error::CorruptLedger`] if the ledger references a
/// revision absent from the chain, or a database error from reading the
/// ledger. Connection failures are the caller's concern; see
/// [`StatusReport::unreachable`].
pub fn evaluate(store: &mut dyn SchemaStore, chain: &RevisionChain) -> Result<StatusReport> {
    let current = store.current_revision()?;
    let pending = chain
        .pending_after(current.as_deref())?
        .iter()
        .map(|revision| revision.id.clone())
        .collect();

    Ok(StatusReport {
        reachable: true,
        current,
        head: chain.head().map(|r| r.id.clone()).unwrap_or_default(),
        pending,
        error: None,
    })
}
