//! Migrate command implementation.
//!
//! Applies pending revisions, optionally waiting for the database to come
//! up first. With `--check-only` nothing is mutated; the exit code alone
//! answers whether the application may start.

use std::time::Duration;

use clap::Args;
use dbready::probe::DEFAULT_POLL_INTERVAL;
use dbready::CheckOutcome;

use crate::error::CliError;
use crate::utils::{resolve_orchestrator, GlobalOptions};

/// Apply pending schema revisions.
#[derive(Args)]
pub struct MigrateCommand {
    /// Wait for the database to accept connections before migrating
    #[arg(long)]
    pub wait_for_db: bool,

    /// Seconds to wait for the database; 0 means a single attempt
    #[arg(
        long,
        value_name = "SECONDS",
        env = "DBREADY_WAIT_TIMEOUT",
        default_value_t = 30
    )]
    pub timeout: u64,

    /// Report whether migrations are needed without applying anything
    #[arg(long)]
    pub check_only: bool,
}

impl MigrateCommand {
    /// Execute the migrate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let orchestrator = resolve_orchestrator(global)?;

        if self.check_only {
            // --wait-for-db still applies in check-only mode: wait out the
            // budget first, then answer the gating question.
            let outcome = if self.wait_for_db {
                orchestrator
                    .check_with_wait(Duration::from_secs(self.timeout), DEFAULT_POLL_INTERVAL)?
            } else {
                orchestrator.check_only()?
            };
            if !global.quiet {
                eprintln!("{outcome}");
            }
            return match outcome {
                CheckOutcome::UpToDate => Ok(()),
                other => Err(CliError::NotReady(other.to_string())),
            };
        }

        let report = if self.wait_for_db {
            orchestrator
                .apply_with_wait(Duration::from_secs(self.timeout), DEFAULT_POLL_INTERVAL)?
        } else {
            orchestrator.apply()?
        };

        if !global.quiet {
            if report.is_noop() {
                eprintln!("Schema is up to date; nothing to apply.");
            } else {
                eprintln!("Applied {} revision(s):", report.applied_count());
                for id in &report.applied {
                    eprintln!("  {id}");
                }
                if report.skipped > 0 {
                    eprintln!(
                        "Skipped {} revision(s) applied by a concurrent runner.",
                        report.skipped
                    );
                }
            }
        }

        // Output the resulting revision to stdout for scripting.
        if let Some(ref current) = report.current {
            println!("{current}");
        }

        Ok(())
    }
}
