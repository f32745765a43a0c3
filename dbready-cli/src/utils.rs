//! Shared utilities for CLI commands.

use dbready::{ConnectionConfig, Orchestrator, RevisionChain};
use log::LevelFilter;

use crate::error::CliError;

/// Global options shared by all commands.
pub struct GlobalOptions {
    pub quiet: bool,
    pub database_url: Option<String>,
}

/// Initialize logging based on verbosity flags.
///
/// `RUST_LOG` takes precedence when set; otherwise the flags pick the
/// default filter level.
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();
}

/// Build an orchestrator from the `--database-url` flag or the
/// `DBREADY_DATABASE_URL` environment variable, over the built-in chain.
pub fn resolve_orchestrator(global: &GlobalOptions) -> Result<Orchestrator, CliError> {
    let config = match &global.database_url {
        Some(url) => ConnectionConfig::new(url),
        None => ConnectionConfig::from_env()?,
    };
    let profile = config.resolve()?;
    Ok(Orchestrator::new(profile, RevisionChain::builtin()))
}
