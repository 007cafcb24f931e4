//! Run records
//!
//! A [`RunRecord`] is the durable side-channel a task keeps between runs: the
//! last-known digest of every source file it has processed, plus the files
//! whose content its last format pass rewrote.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Digest, RelativePath};

/// Persisted per-task state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    fingerprints: BTreeMap<RelativePath, Digest>,
    changed_paths: BTreeSet<RelativePath>,
}

impl RunRecord {
    /// An empty record (first run)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from its parts
    #[must_use]
    pub const fn from_parts(
        fingerprints: BTreeMap<RelativePath, Digest>,
        changed_paths: BTreeSet<RelativePath>,
    ) -> Self {
        Self {
            fingerprints,
            changed_paths,
        }
    }

    /// All recorded fingerprints
    #[must_use]
    pub const fn fingerprints(&self) -> &BTreeMap<RelativePath, Digest> {
        &self.fingerprints
    }

    /// Recorded digest for a path
    #[must_use]
    pub fn fingerprint(&self, path: &RelativePath) -> Option<&Digest> {
        self.fingerprints.get(path)
    }

    /// Paths rewritten by the last format pass
    #[must_use]
    pub const fn changed_paths(&self) -> &BTreeSet<RelativePath> {
        &self.changed_paths
    }

    /// Record the digest for a path
    pub fn insert_fingerprint(&mut self, path: RelativePath, digest: Digest) {
        self.fingerprints.insert(path, digest);
    }

    /// Forget a path entirely
    pub fn remove(&mut self, path: &RelativePath) {
        self.fingerprints.remove(path);
        self.changed_paths.remove(path);
    }

    /// Mark a path as rewritten by formatting
    pub fn mark_changed(&mut self, path: RelativePath) {
        self.changed_paths.insert(path);
    }

    /// Keep only the paths for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&RelativePath) -> bool) {
        self.fingerprints.retain(|path, _| keep(path));
        self.changed_paths.retain(|path| keep(path));
    }

    /// Number of fingerprinted files
    #[must_use]
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    /// Whether no files are recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty() && self.changed_paths.is_empty()
    }

    /// Whether every live file's current digest matches its recorded digest
    ///
    /// An empty live set is trivially up to date.
    #[must_use]
    pub fn is_up_to_date(&self, live: &BTreeMap<RelativePath, Digest>) -> bool {
        live.iter().all(|(path, digest)| self.fingerprints.get(path) == Some(digest))
    }
}
