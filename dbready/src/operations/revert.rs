//! Single-step revert of the most recently applied revision.

use crate::database::SchemaStore;
use crate::error::{Error, Result};
use crate::revision::RevisionChain;

/// Undoes exactly the most recently applied revision.
///
/// Returns the reverted revision id, or `None` when the ledger is empty
/// (nothing to revert).
///
/// # Errors
///
/// Returns [`Error::CorruptLedger`] if the ledger's newest entry is not in
/// the chain, [`Error::IrreversibleRevision`] if that revision has no down
/// section, or [`Error::RevisionApply`] if executing the reverse unit
/// fails.
pub fn revert_last(store: &mut dyn SchemaStore, chain: &RevisionChain) -> Result<Option<String>> {
    let Some(current) = store.current_revision()? else {
        log::debug!("revision ledger is empty, nothing to revert");
        return Ok(None);
    };

    let position = chain
        .position_of(&current)
        .ok_or_else(|| Error::CorruptLedger {
            revision_id: current.clone(),
        })?;
    let revision = &chain.revisions()[position];

    store.revert_revision(revision)?;
    log::info!("reverted revision {}", revision.id);
    Ok(Some(revision.id.clone()))
}
