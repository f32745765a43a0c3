//! Main entry point for the dbready CLI.
//!
//! This is the command-line interface for database schema lifecycle
//! management. It provides commands for gating deployments:
//! - `status`: Report the current and pending schema revisions
//! - `migrate`: Apply pending revisions, with optional wait and check-only
//! - `revert`: Undo the most recently applied revision
//! - `create`: Scaffold a new revision file

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    utils::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        quiet: cli.quiet,
        database_url: cli.database_url,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Status(cmd) => cmd.execute(&global),
        cli::Command::Migrate(cmd) => cmd.execute(&global),
        cli::Command::Revert(cmd) => cmd.execute(&global),
        cli::Command::Create(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
