//! Create command implementation.
//!
//! Scaffolds a new revision file chained onto the current head. By default
//! this asks for schema autogeneration, which is not wired in; pass
//! `--no-autogenerate` to get an empty template to fill in by hand.

use std::path::PathBuf;

use clap::Args;
use dbready::{create_revision, ScaffoldOptions};

use crate::error::CliError;
use crate::utils::GlobalOptions;

/// Scaffold a new revision file.
#[derive(Args)]
pub struct CreateCommand {
    /// Description of the revision; also used to derive its id
    pub description: String,

    /// Directory holding the revision files
    #[arg(long, value_name = "PATH", default_value = "revisions")]
    pub dir: PathBuf,

    /// Write an empty template instead of autogenerating the SQL body
    #[arg(long)]
    pub no_autogenerate: bool,
}

impl CreateCommand {
    /// Execute the create command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let options = ScaffoldOptions::new(self.description, self.dir)
            .with_autogenerate(!self.no_autogenerate);

        let result = create_revision(&options)?;

        if !global.quiet {
            eprintln!("Created revision {}.", result.id);
            match result.predecessor {
                Some(ref prior) => eprintln!("  Predecessor: {prior}"),
                None => eprintln!("  Predecessor: (root)"),
            }
            eprintln!("  File: {}", result.path.display());
        }
        println!("{}", result.path.display());

        Ok(())
    }
}
