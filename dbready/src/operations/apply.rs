//! The migration runner: ordered, resumable application of pending
//! revisions.
//!
//! Each revision commits in its own transaction, so a failure partway
//! through leaves every earlier revision durably applied. Re-running is
//! always safe: the pending set is recomputed from the ledger's actual
//! state, and a revision another runner committed concurrently is skipped,
//! not re-applied.

use serde::Serialize;

use crate::database::{ApplyOutcome, SchemaStore};
use crate::error::Result;
use crate::revision::RevisionChain;

/// Result of one `apply_pending` run.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// Ids of revisions this run applied, in chain order.
    pub applied: Vec<String>,
    /// Revisions found already applied by a concurrent runner.
    pub skipped: usize,
    /// The ledger's current revision after the run.
    pub current: Option<String>,
}

impl ApplyReport {
    /// Number of revisions this run applied.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// True when there was nothing to do.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.skipped == 0
    }
}

/// Applies all pending revisions strictly in chain order.
///
/// Stops at the first failure and reports it; revisions committed in prior
/// iterations remain applied. Calling this on an up-to-date schema is a
/// no-op success.
///
/// # Errors
///
/// Returns [`crate::Error::RevisionApply`] naming the failing revision,
/// [`crate::Error::CorruptLedger`] on code/schema version skew, or a
/// database error from reading the ledger.
pub fn apply_pending(store: &mut dyn SchemaStore, chain: &RevisionChain) -> Result<ApplyReport> {
    let current = store.current_revision()?;
    let pending = chain.pending_after(current.as_deref())?;

    if pending.is_empty() {
        log::debug!("schema already at head, nothing to apply");
        return Ok(ApplyReport {
            applied: Vec::new(),
            skipped: 0,
            current,
        });
    }

    log::info!("applying {} pending revision(s)", pending.len());

    let mut applied = Vec::new();
    let mut skipped = 0;
    for revision in pending {
        match store.apply_revision(revision)? {
            ApplyOutcome::Applied => {
                log::info!("applied revision {}", revision.id);
                applied.push(revision.id.clone());
            }
            ApplyOutcome::AlreadyApplied => {
                log::info!(
                    "revision {} was applied by a concurrent runner, skipping",
                    revision.id
                );
                skipped += 1;
            }
        }
    }

    let current = store.current_revision()?;
    Ok(ApplyReport {
        applied,
        skipped,
        current,
    })
}
