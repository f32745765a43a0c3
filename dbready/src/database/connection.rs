//! Blocking PostgreSQL implementation of the store seam.
//!
//! [`Database`] wraps a blocking client derived from the resolved
//! connection profile. Every revision applies in its own transaction, and
//! the ledger insert happens before the change unit runs, so a concurrent
//! runner blocks on the ledger row (and then sees a uniqueness violation)
//! instead of colliding mid-DDL.

use postgres::error::SqlState;
use postgres::{Client, NoTls};

use crate::database::config::ConnectionProfile;
use crate::database::schema::{
    CREATE_LEDGER_TABLE, DELETE_LEDGER_ENTRY, INSERT_LEDGER_ENTRY, SELECT_CURRENT_REVISION,
};
use crate::database::store::{ApplyOutcome, SchemaStore};
use crate::error::{Error, Result};
use crate::revision::Revision;

/// A blocking database connection for administrative operations.
///
/// # Examples
///
/// ```no_run
/// use dbready::{ConnectionProfile, Database};
///
/// let profile = ConnectionProfile::resolve("postgres://app@localhost/app").unwrap();
/// let db = Database::connect(&profile).unwrap();
/// ```
pub struct Database {
    client: Client,
    ledger_ready: bool,
}

impl Database {
    /// Opens a blocking connection using the profile's administrative
    /// descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the connection cannot be established.
    pub fn connect(profile: &ConnectionProfile) -> Result<Self> {
        log::debug!("connecting to {}", profile.redacted());
        let client = profile.probe_config().connect(NoTls)?;
        Ok(Self {
            client,
            ledger_ready: false,
        })
    }

    /// Returns a mutable reference to the underlying client for operations
    /// outside the store contract.
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    // Creates the ledger table once per connection, outside any revision
    // transaction. IF NOT EXISTS is not atomic across backends: two runners
    // racing an empty database can both pass the existence check, and the
    // loser's CREATE fails with duplicate_table (or a catalog
    // unique-violation). Either way the table exists, which is all we need.
    fn ensure_ledger_table(&mut self) -> Result<()> {
        if self.ledger_ready {
            return Ok(());
        }
        match self.client.batch_execute(CREATE_LEDGER_TABLE) {
            Ok(()) => {}
            Err(error)
                if error.code() == Some(&SqlState::DUPLICATE_TABLE)
                    || error.code() == Some(&SqlState::UNIQUE_VIOLATION) =>
            {
                log::debug!("revision ledger table created by a concurrent runner");
            }
            Err(error) => return Err(error.into()),
        }
        self.ledger_ready = true;
        Ok(())
    }
}

impl SchemaStore for Database {
    fn current_revision(&mut self) -> Result<Option<String>> {
        match self.client.query_opt(SELECT_CURRENT_REVISION, &[]) {
            Ok(row) => {
                let current: Option<String> = row.map(|row| row.get(0));
                if current.is_none() {
                    log::debug!("revision ledger is empty");
                }
                Ok(current)
            }
            Err(error) if error.code() == Some(&SqlState::UNDEFINED_TABLE) => {
                log::debug!("revision ledger table does not exist yet");
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn apply_revision(&mut self, revision: &Revision) -> Result<ApplyOutcome> {
        self.ensure_ledger_table()?;
        let mut tx = self.client.transaction()?;

        // Ledger insert first: a concurrent runner applying the same
        // revision blocks here until we commit, then fails the uniqueness
        // check instead of racing our DDL.
        match tx.execute(INSERT_LEDGER_ENTRY, &[&revision.id]) {
            Ok(_) => {}
            Err(error) if error.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                log::debug!("revision {} already recorded by another runner", revision.id);
                return Ok(ApplyOutcome::AlreadyApplied);
            }
            Err(error) => {
                return Err(Error::RevisionApply {
                    id: revision.id.clone(),
                    source: Box::new(error),
                })
            }
        }

        if let Err(error) = tx.batch_execute(&revision.up) {
            return Err(Error::RevisionApply {
                id: revision.id.clone(),
                source: Box::new(error),
            });
        }

        tx.commit()?;
        Ok(ApplyOutcome::Applied)
    }

    fn revert_revision(&mut self, revision: &Revision) -> Result<()> {
        let down = revision
            .down
            .as_deref()
            .ok_or_else(|| Error::IrreversibleRevision {
                id: revision.id.clone(),
            })?;

        let mut tx = self.client.transaction()?;

        let deleted = tx.execute(DELETE_LEDGER_ENTRY, &[&revision.id])?;
        if deleted == 0 {
            // The caller believed this was the newest applied revision but
            // the ledger disagrees.
            return Err(Error::CorruptLedger {
                revision_id: revision.id.clone(),
            });
        }

        if let Err(error) = tx.batch_execute(down) {
            return Err(Error::RevisionApply {
                id: revision.id.clone(),
                source: Box::new(error),
            });
        }

        tx.commit()?;
        Ok(())
    }
}
