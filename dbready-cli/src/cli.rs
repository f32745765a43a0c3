//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use clap::{Parser, Subcommand};

use crate::commands::{CreateCommand, MigrateCommand, RevertCommand, StatusCommand};

/// Command-line tool for gating deployments on database schema state.
#[derive(Parser)]
#[command(name = "dbready")]
#[command(version, about = "Probe database readiness and manage schema revisions", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Database connection URL
    #[arg(long, value_name = "URL", global = true, env = "DBREADY_DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Report the current schema revision and pending revisions
    Status(StatusCommand),

    /// Apply pending schema revisions
    Migrate(MigrateCommand),

    /// Revert the most recently applied revision
    Revert(RevertCommand),

    /// Scaffold a new revision file
    Create(CreateCommand),
}
