//! Status command implementation.
//!
//! Reports where the schema stands relative to the built-in revision
//! chain, for humans by default or as JSON for automation.

use clap::Args;

use crate::error::CliError;
use crate::utils::{resolve_orchestrator, GlobalOptions};

/// Report the current schema revision and pending revisions.
#[derive(Args)]
pub struct StatusCommand {
    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    /// Execute the status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let orchestrator = resolve_orchestrator(global)?;
        let report = orchestrator.status()?;

        if self.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::Config(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        } else if !report.reachable {
            eprintln!("Database: unreachable");
            if let Some(ref error) = report.error {
                eprintln!("  {error}");
            }
        } else {
            eprintln!(
                "Current revision: {}",
                report.current.as_deref().unwrap_or("(none)")
            );
            eprintln!("Head revision:    {}", report.head);
            if report.pending.is_empty() {
                eprintln!("Schema is up to date.");
            } else {
                eprintln!("Pending revisions ({}):", report.pending.len());
                for id in &report.pending {
                    eprintln!("  {id}");
                }
            }
        }

        if !report.reachable {
            Err(CliError::NotReady(format!(
                "database is unreachable: {}",
                report.error.unwrap_or_default()
            )))
        } else if report.needs_migration() {
            Err(CliError::NotReady(format!(
                "{} revision(s) pending",
                report.pending.len()
            )))
        } else {
            Ok(())
        }
    }
}
