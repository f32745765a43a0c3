//! Revision-ledger SQL constants.
//!
//! The ledger table is the durable state of the whole subsystem: one row per
//! applied revision, living inside the target database. The PRIMARY KEY on
//! `revision_id` doubles as the guard against two orchestrator instances
//! applying the same revision concurrently.

/// Name of the revision ledger table.
pub const LEDGER_TABLE: &str = "schema_revisions";

/// SQL statement to create the revision ledger table.
///
/// `applied_at` defaults to `clock_timestamp()` rather than `now()` so
/// entries are ordered by actual insertion time, not transaction start;
/// `ordinal` breaks timestamp ties by insertion order.
pub const CREATE_LEDGER_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS schema_revisions (
        ordinal BIGSERIAL,
        revision_id TEXT PRIMARY KEY,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
    )";

/// SQL statement to read the most recently applied revision id.
pub const SELECT_CURRENT_REVISION: &str = r"
    SELECT revision_id FROM schema_revisions
    ORDER BY applied_at DESC, ordinal DESC
    LIMIT 1";

/// SQL statement to record one applied revision.
pub const INSERT_LEDGER_ENTRY: &str = "INSERT INTO schema_revisions (revision_id) VALUES ($1)";

/// SQL statement to remove one ledger entry, used only by revert.
pub const DELETE_LEDGER_ENTRY: &str = "DELETE FROM schema_revisions WHERE revision_id = $1";

/// No-op query used by the readiness prober's round-trip.
pub const PING_QUERY: &str = "SELECT 1";
