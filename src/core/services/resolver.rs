//! Change-set resolution
//!
//! Decides which files a run must process by combining the host build's
//! deltas with what the previous run recorded.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::models::{ChangeType, Digest, FileChange, RunRecord};

/// Paths and patterns the resolver works against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ResolverConfig {
    /// Create a configuration for sources under `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Project root all recorded paths are relative to
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recognized source extensions, without the dot
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `file` has one of the recognized extensions
    #[must_use]
    pub fn is_recognized(&self, file: &Path) -> bool {
        file.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }
}

/// Files a run must process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: BTreeSet<PathBuf>,
    recovered: BTreeSet<PathBuf>,
}

impl ChangeSet {
    /// All files to process, in path order
    #[must_use]
    pub const fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    /// Files included only because the previous record left them stale
    #[must_use]
    pub const fn recovered(&self) -> &BTreeSet<PathBuf> {
        &self.recovered
    }

    /// Whether `file` must be processed
    #[must_use]
    pub fn contains(&self, file: &Path) -> bool {
        self.files.contains(file)
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether there is nothing to do
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sorted list for dispatch
    #[must_use]
    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.files.iter().cloned().collect()
    }
}

/// Computes the [`ChangeSet`] for one run
#[derive(Debug, Clone)]
pub struct ChangeSetResolver {
    config: ResolverConfig,
}

impl ChangeSetResolver {
    /// Create a resolver
    #[must_use]
    pub const fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The resolver's configuration
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve using on-disk fingerprints
    #[must_use]
    pub fn resolve(
        &self,
        deltas: &[FileChange],
        previous: Option<&RunRecord>,
        live: &BTreeSet<PathBuf>,
    ) -> ChangeSet {
        self.resolve_with(deltas, previous, live, crate::fingerprint::fingerprint)
    }

    /// Resolve with a caller-supplied digest function
    ///
    /// 1. Added or modified deltas with a recognized extension that are still live.
    /// 2. Live paths from the previous record's changed list whose current digest
    ///    differs from the recorded one. Unreadable files count as differing.
    /// 3. Minus every removed delta.
    pub fn resolve_with<F>(
        &self,
        deltas: &[FileChange],
        previous: Option<&RunRecord>,
        live: &BTreeSet<PathBuf>,
        current_digest: F,
    ) -> ChangeSet
    where
        F: Fn(&Path) -> io::Result<Digest>,
    {
        let mut files: BTreeSet<PathBuf> = deltas
            .iter()
            .filter(|delta| matches!(delta.change, ChangeType::Added | ChangeType::Modified))
            .filter(|delta| self.config.is_recognized(&delta.file))
            .filter(|delta| live.contains(&delta.file))
            .map(|delta| delta.file.clone())
            .collect();

        let mut recovered = BTreeSet::new();
        if let Some(record) = previous {
            for path in record.changed_paths() {
                let file = path.resolve(&self.config.root);
                if !live.contains(&file) || files.contains(&file) {
                    continue;
                }
                let stale = match current_digest(&file) {
                    Ok(digest) => record.fingerprint(path) != Some(&digest),
                    Err(e) => {
                        log::debug!("treating {path} as stale: {e}");
                        true
                    },
                };
                if stale {
                    log::debug!("recovering {path} from previous run");
                    recovered.insert(file.clone());
                    files.insert(file);
                }
            }
        }

        for delta in deltas.iter().filter(|delta| delta.is_removal()) {
            files.remove(&delta.file);
            recovered.remove(&delta.file);
        }

        ChangeSet { files, recovered }
    }
}
