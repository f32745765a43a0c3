//! Database layer: connection resolution, readiness probing, and the
//! revision-ledger store.
//!
//! One configured URL ([`ConnectionConfig`]) resolves into a
//! [`ConnectionProfile`] carrying both driver forms. The readiness prober
//! ([`probe`]) answers "is the database up yet" within a bounded budget,
//! and [`Database`] implements the [`SchemaStore`] seam the migration
//! runner operates through.

mod config;
mod connection;
pub mod probe;
pub mod schema;
mod store;

pub use config::{ConnectionConfig, ConnectionProfile};
pub use connection::Database;
pub use store::{ApplyOutcome, SchemaStore};
