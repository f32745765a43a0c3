//! Shared test fixtures: an in-memory schema store and chain builders.

use std::sync::{Arc, Mutex};

use dbready::{ApplyOutcome, Error, Revision, RevisionChain, SchemaStore};

/// In-memory [`SchemaStore`] honoring the same atomicity and uniqueness
/// contract as the real database implementation.
///
/// The ledger is an `Arc<Mutex<_>>` so two stores can share one ledger,
/// modeling two runner processes racing against the same database.
pub struct MemoryStore {
    ledger: Arc<Mutex<Vec<String>>>,
    fail_on: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    /// A second store over the same ledger, as a concurrent runner sees it.
    pub fn sharing_ledger(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            fail_on: None,
        }
    }

    /// Makes `apply_revision` fail for the given id, simulating a revision
    /// whose SQL is broken.
    pub fn fail_on(mut self, revision_id: &str) -> Self {
        self.fail_on = Some(revision_id.to_string());
        self
    }

    pub fn clear_failure(&mut self) {
        self.fail_on = None;
    }

    pub fn ledger(&self) -> Vec<String> {
        self.ledger.lock().unwrap().clone()
    }

    /// Pretends the ledger holds revisions the running code does not know.
    pub fn seed(&mut self, ids: &[&str]) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.extend(ids.iter().map(|id| (*id).to_string()));
    }
}

impl SchemaStore for MemoryStore {
    fn current_revision(&mut self) -> dbready::Result<Option<String>> {
        Ok(self.ledger.lock().unwrap().last().cloned())
    }

    fn apply_revision(&mut self, revision: &Revision) -> dbready::Result<ApplyOutcome> {
        if self.fail_on.as_deref() == Some(revision.id.as_str()) {
            return Err(Error::RevisionApply {
                id: revision.id.clone(),
                source: "simulated SQL failure".to_string().into(),
            });
        }
        let mut ledger = self.ledger.lock().unwrap();
        if ledger.contains(&revision.id) {
            return Ok(ApplyOutcome::AlreadyApplied);
        }
        ledger.push(revision.id.clone());
        Ok(ApplyOutcome::Applied)
    }

    fn revert_revision(&mut self, revision: &Revision) -> dbready::Result<()> {
        if revision.down.is_none() {
            return Err(Error::IrreversibleRevision {
                id: revision.id.clone(),
            });
        }
        let mut ledger = self.ledger.lock().unwrap();
        if ledger.last().map(String::as_str) != Some(revision.id.as_str()) {
            return Err(Error::CorruptLedger {
                revision_id: revision.id.clone(),
            });
        }
        ledger.pop();
        Ok(())
    }
}

/// Builds a linear chain of `n` reversible revisions named `r1`..`rn`.
pub fn linear_chain(n: usize) -> RevisionChain {
    let revisions = (1..=n)
        .map(|i| Revision {
            id: format!("r{i}"),
            predecessor: (i > 1).then(|| format!("r{}", i - 1)),
            description: format!("step {i}"),
            up: format!("CREATE TABLE t{i} (id INT)"),
            down: Some(format!("DROP TABLE t{i}")),
        })
        .collect();
    RevisionChain::new(revisions).unwrap()
}
