//! Revision and revision-chain types.
//!
//! A [`Revision`] is a single, uniquely identified schema-change unit with a
//! forward SQL section and an optional reverse section. Revisions are
//! authored as `.sql` files with a small comment header and linked to their
//! predecessor by id, and a [`RevisionChain`] validates that the full set
//! forms one linear history: exactly one root, no branches, no cycles.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Error, Result};

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

/// A single schema-change unit.
///
/// Revisions are created at authoring time and never mutated at runtime.
/// The `up` section is the forward-change SQL executed by the migration
/// runner; the optional `down` section reverses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Unique identifier, e.g. `20250602_add_proxies`.
    pub id: String,
    /// Id of the preceding revision, or `None` for the chain root.
    pub predecessor: Option<String>,
    /// Human-readable summary from the file header.
    pub description: String,
    /// Forward-change SQL.
    pub up: String,
    /// Reverse-change SQL, if the revision is reversible.
    pub down: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Up,
    Down,
}

impl Revision {
    /// Parses a revision from its file text.
    ///
    /// The expected layout is a comment header followed by `-- up` and
    /// optional `-- down` section markers:
    ///
    /// ```text
    /// -- revision: 20250602_add_proxies
    /// -- predecessor: 20250601_initial_schema
    /// -- description: add proxies table
    ///
    /// -- up
    /// CREATE TABLE proxies (...);
    ///
    /// -- down
    /// DROP TABLE proxies;
    /// ```
    ///
    /// A missing or empty `-- predecessor:` line marks the chain root. An
    /// empty `-- down` section means the revision is irreversible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChainInvalid`] if the `-- revision:` header is
    /// missing or empty.
    pub fn parse(text: &str) -> Result<Self> {
        let mut id: Option<String> = None;
        let mut predecessor: Option<String> = None;
        let mut description = String::new();
        let mut up = String::new();
        let mut down = String::new();
        let mut section = Section::Header;

        for line in text.lines() {
            match line.trim() {
                "-- up" => {
                    section = Section::Up;
                    continue;
                }
                "-- down" => {
                    section = Section::Down;
                    continue;
                }
                _ => {}
            }

            match section {
                Section::Header => {
                    let Some(rest) = line.trim().strip_prefix("--") else {
                        continue;
                    };
                    let rest = rest.trim();
                    if let Some(value) = rest.strip_prefix("revision:") {
                        id = Some(value.trim().to_string());
                    } else if let Some(value) = rest.strip_prefix("predecessor:") {
                        let value = value.trim();
                        if !value.is_empty() {
                            predecessor = Some(value.to_string());
                        }
                    } else if let Some(value) = rest.strip_prefix("description:") {
                        description = value.trim().to_string();
                    }
                }
                Section::Up => {
                    up.push_str(line);
                    up.push('\n');
                }
                Section::Down => {
                    down.push_str(line);
                    down.push('\n');
                }
            }
        }

        let id = id.filter(|v| !v.is_empty()).ok_or_else(|| Error::ChainInvalid {
            message: "revision file is missing a '-- revision:' header".to_string(),
        })?;

        let down = down.trim().to_string();
        Ok(Self {
            id,
            predecessor,
            description,
            up: up.trim().to_string(),
            down: if down.is_empty() { None } else { Some(down) },
        })
    }

    /// Returns true if the revision has a reverse-change unit.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.down.is_some()
    }
}

/// The statically defined, ordered sequence of all known revisions.
///
/// Construction validates the linked-list invariant: exactly one root
/// (no predecessor), every other revision referencing an existing
/// predecessor, and no branches or cycles. The chain is immutable once
/// built.
///
/// # Examples
///
/// ```
/// use dbready::RevisionChain;
///
/// let chain = RevisionChain::builtin();
/// assert!(!chain.is_empty());
/// assert!(chain.root().unwrap().predecessor.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RevisionChain {
    revisions: Vec<Revision>,
}

impl RevisionChain {
    /// Builds a chain from an unordered set of revisions, ordering them
    /// root-first by following predecessor links.
    ///
    /// An empty set produces an empty chain; the scaffolder relies on this
    /// when starting a fresh revisions directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChainInvalid`] if the set contains duplicate ids,
    /// zero or multiple roots, a predecessor reference to an unknown id,
    /// a branch (two revisions sharing a predecessor), or a cycle.
    pub fn new(revisions: Vec<Revision>) -> Result<Self> {
        if revisions.is_empty() {
            return Ok(Self { revisions });
        }

        let mut ids = HashSet::new();
        for revision in &revisions {
            if !ids.insert(revision.id.as_str()) {
                return Err(Error::ChainInvalid {
                    message: format!("duplicate revision id '{}'", revision.id),
                });
            }
        }

        let mut successor: HashMap<&str, &Revision> = HashMap::new();
        let mut root: Option<&Revision> = None;
        for revision in &revisions {
            match revision.predecessor.as_deref() {
                None => {
                    if let Some(existing) = root {
                        return Err(Error::ChainInvalid {
                            message: format!(
                                "multiple roots: '{}' and '{}' both have no predecessor",
                                existing.id, revision.id
                            ),
                        });
                    }
                    root = Some(revision);
                }
                Some(pred) => {
                    if !ids.contains(pred) {
                        return Err(Error::ChainInvalid {
                            message: format!(
                                "revision '{}' references unknown predecessor '{pred}'",
                                revision.id
                            ),
                        });
                    }
                    if let Some(sibling) = successor.insert(pred, revision) {
                        return Err(Error::ChainInvalid {
                            message: format!(
                                "branch at '{pred}': both '{}' and '{}' claim it as predecessor",
                                sibling.id, revision.id
                            ),
                        });
                    }
                }
            }
        }

        let root = root.ok_or_else(|| Error::ChainInvalid {
            message: "no root revision (every revision has a predecessor)".to_string(),
        })?;

        let mut ordered = Vec::with_capacity(revisions.len());
        let mut current = root;
        loop {
            ordered.push(current.clone());
            match successor.get(current.id.as_str()) {
                Some(next) => current = next,
                None => break,
            }
        }

        // Any leftover revision is unreachable from the root, which with the
        // checks above can only mean a cycle off the main line.
        if ordered.len() != revisions.len() {
            return Err(Error::ChainInvalid {
                message: format!(
                    "{} revision(s) are not reachable from the root (cycle?)",
                    revisions.len() - ordered.len()
                ),
            });
        }

        Ok(Self { revisions: ordered })
    }

    /// Loads a chain from a directory of `*.sql` revision files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read, a file cannot be
    /// parsed, or the resulting set violates the chain invariant.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
            .collect();
        // Deterministic parse order keeps error messages stable.
        paths.sort();

        let mut revisions = Vec::with_capacity(paths.len());
        for path in paths {
            let text = std::fs::read_to_string(&path)?;
            revisions.push(Revision::parse(&text)?);
        }
        Self::new(revisions)
    }

    /// Returns the revision chain embedded in this crate: the schema history
    /// of the host application.
    ///
    /// # Panics
    ///
    /// Panics if the embedded revision files are malformed, which would be a
    /// packaging defect caught by this crate's own tests.
    #[must_use]
    pub fn builtin() -> Self {
        let sources = [
            include_str!("../../revisions/20250601_initial_schema.sql"),
            include_str!("../../revisions/20250602_add_proxies.sql"),
            include_str!("../../revisions/20250603_add_proxy_id.sql"),
            include_str!("../../revisions/20250604_remove_proxy_column.sql"),
        ];
        let revisions = sources
            .iter()
            .map(|text| Revision::parse(text))
            .collect::<Result<Vec<_>>>()
            .expect("embedded revision files parse");
        Self::new(revisions).expect("embedded revision chain is linear")
    }

    /// Returns the ordered revisions, root first.
    #[must_use]
    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    /// Returns the first revision, or `None` for an empty chain.
    #[must_use]
    pub fn root(&self) -> Option<&Revision> {
        self.revisions.first()
    }

    /// Returns the last revision (the fully up-to-date target state).
    #[must_use]
    pub fn head(&self) -> Option<&Revision> {
        self.revisions.last()
    }

    /// Returns the position of a revision id within the chain.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.revisions.iter().position(|revision| revision.id == id)
    }

    /// Returns the number of revisions in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Returns true if the chain contains no revisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Computes the pending suffix after the given current revision.
    ///
    /// With `current = None` (never-initialized ledger) the entire chain is
    /// pending. Otherwise the result is the ordered suffix strictly after
    /// the current revision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptLedger`] if `current` is not in the chain:
    /// the ledger references a revision unknown to the running code.
    pub fn pending_after(&self, current: Option<&str>) -> Result<&[Revision]> {
        match current {
            None => Ok(&self.revisions),
            Some(id) => {
                let position = self.position_of(id).ok_or_else(|| Error::CorruptLedger {
                    revision_id: id.to_string(),
                })?;
                Ok(&self.revisions[position + 1..])
            }
        }
    }
}
