//! Command implementations for the dbready CLI.

mod create;
mod migrate;
mod revert;
mod status;

pub use create::CreateCommand;
pub use migrate::MigrateCommand;
pub use revert::RevertCommand;
pub use status::StatusCommand;
