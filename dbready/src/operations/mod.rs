//! Migration operations: status evaluation, ordered apply, single-step
//! revert, and revision scaffolding.
//!
//! All operations are written against the [`crate::SchemaStore`] seam.
//! Status evaluation is read-only; the runner mutates the schema one
//! revision per transaction; scaffolding touches only the filesystem.

pub mod apply;
pub mod revert;
pub mod scaffold;
pub mod status;

pub use apply::{apply_pending, ApplyReport};
pub use revert::revert_last;
pub use scaffold::{create_revision, ScaffoldOptions, ScaffoldResult};
pub use status::{evaluate, StatusReport};
