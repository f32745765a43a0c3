//! Database schema lifecycle management for service deployments.
//!
//! `dbready` answers two questions every deployment asks before starting an
//! application: is the database ready to accept connections, and is its
//! schema at the expected revision? It provides a bounded-time readiness
//! prober with transient/fatal failure classification, a linear revision
//! chain with a durable per-database ledger, an idempotent migration
//! runner, and a high-level [`Orchestrator`] facade whose check-only mode
//! renders a single go/no-go bit for automation.
//!
//! # Examples
//!
//! Gate an application start on a ready, up-to-date schema:
//!
//! ```no_run
//! use std::time::Duration;
//! use dbready::Orchestrator;
//!
//! # fn main() -> dbready::Result<()> {
//! let orchestrator = Orchestrator::from_env()?;
//! let report = orchestrator.apply_with_wait(
//!     Duration::from_secs(30),
//!     Duration::from_secs(2),
//! )?;
//! println!("applied {} revision(s)", report.applied_count());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod database;
pub mod error;
pub mod operations;
mod orchestrator;
pub mod revision;

pub use database::probe;
pub use database::{ApplyOutcome, ConnectionConfig, ConnectionProfile, Database, SchemaStore};
pub use error::{Error, Result};
pub use operations::{
    apply_pending, create_revision, evaluate, revert_last, ApplyReport, ScaffoldOptions,
    ScaffoldResult, StatusReport,
};
pub use orchestrator::{CheckOutcome, Orchestrator};
pub use revision::{Revision, RevisionChain};
