//! Revision scaffolding for developers.
//!
//! Creates a new revision file whose predecessor is the current chain head,
//! advancing the head to the new revision. The SQL body is left for the
//! author: autogeneration from a schema model is the job of an external
//! diffing tool, not this crate.

use std::path::PathBuf;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::revision::RevisionChain;

/// Options for scaffolding a new revision.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Human-readable description; also used to derive the id slug.
    pub description: String,
    /// Directory holding the revision files.
    pub directory: PathBuf,
    /// Whether to ask an external differ to fill in the SQL body.
    pub autogenerate: bool,
}

impl ScaffoldOptions {
    /// Creates scaffold options with autogeneration disabled.
    #[must_use]
    pub fn new(description: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            description: description.into(),
            directory: directory.into(),
            autogenerate: false,
        }
    }

    /// Sets the autogenerate flag.
    #[must_use]
    pub const fn with_autogenerate(mut self, autogenerate: bool) -> Self {
        self.autogenerate = autogenerate;
        self
    }
}

/// Result of scaffolding a new revision.
#[derive(Debug)]
pub struct ScaffoldResult {
    /// The new revision's id; it is now the chain head.
    pub id: String,
    /// The prior head, now the new revision's predecessor.
    pub predecessor: Option<String>,
    /// Path of the file that was written.
    pub path: PathBuf,
}

/// Creates a new empty revision file at the head of the chain.
///
/// The target directory's existing files are loaded and validated first, so
/// a broken chain is reported before anything is written.
///
/// # Errors
///
/// Returns [`Error::Config`] if autogeneration was requested (no external
/// differ is wired in) or the description yields an empty slug,
/// [`Error::ChainInvalid`] if the existing directory does not form a valid
/// chain, or an I/O error from reading or writing files.
pub fn create_revision(options: &ScaffoldOptions) -> Result<ScaffoldResult> {
    if options.autogenerate {
        return Err(Error::Config {
            message: "schema autogeneration is delegated to an external differ; \
                      re-run with --no-autogenerate and fill in the up/down sections"
                .to_string(),
        });
    }

    let slug = slugify(&options.description);
    if slug.is_empty() {
        return Err(Error::Config {
            message: "description must contain at least one alphanumeric character".to_string(),
        });
    }

    std::fs::create_dir_all(&options.directory)?;
    let chain = RevisionChain::load_dir(&options.directory)?;
    let predecessor = chain.head().map(|revision| revision.id.clone());

    // Ids carry second-resolution timestamps; bump until the path is free
    // so a second scaffold within the same second cannot overwrite the
    // first.
    let mut stamp = Utc::now();
    let (id, path) = loop {
        let id = format!("{}_{slug}", stamp.format("%Y%m%d%H%M%S"));
        let path = options.directory.join(format!("{id}.sql"));
        if !path.exists() {
            break (id, path);
        }
        stamp += chrono::Duration::seconds(1);
    };

    let mut header = format!("-- revision: {id}\n");
    if let Some(ref prior) = predecessor {
        header.push_str(&format!("-- predecessor: {prior}\n"));
    }
    header.push_str(&format!("-- description: {}\n", options.description));

    let contents = format!("{header}\n-- up\n\n\n-- down\n");
    std::fs::write(&path, contents)?;
    log::info!("created revision {id} at {}", path.display());

    Ok(ScaffoldResult {
        id,
        predecessor,
        path,
    })
}

// Lowercase alphanumeric slug with single underscores between words.
fn slugify(description: &str) -> String {
    let mut slug = String::with_capacity(description.len());
    let mut last_was_separator = true;
    for ch in description.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            slug.push('_');
            last_was_separator = true;
        }
    }
    slug.trim_end_matches('_').to_string()
}
