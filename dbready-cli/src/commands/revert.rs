//! Revert command implementation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{resolve_orchestrator, GlobalOptions};

/// Revert the most recently applied revision.
#[derive(Args)]
pub struct RevertCommand {}

impl RevertCommand {
    /// Execute the revert command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let orchestrator = resolve_orchestrator(global)?;

        match orchestrator.revert_last()? {
            Some(id) => {
                if !global.quiet {
                    eprintln!("Reverted revision {id}.");
                }
                println!("{id}");
            }
            None => {
                if !global.quiet {
                    eprintln!("Revision ledger is empty; nothing to revert.");
                }
            }
        }

        Ok(())
    }
}
