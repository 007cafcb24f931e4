//! Deltas supplied by an outer build integration

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::core::models::{ChangeType, FileChange};
use crate::core::ports::DeltaSource;

#[derive(Debug, Deserialize)]
struct DeltaEntry {
    file: PathBuf,
    change: ChangeType,
}

/// A fixed list of deltas
#[derive(Debug, Clone, Default)]
pub struct ExplicitDeltas {
    changes: Vec<FileChange>,
}

impl ExplicitDeltas {
    /// Deltas from `--changed` / `--removed` paths, relative to `base`
    #[must_use]
    pub fn new(base: &Path, changed: &[PathBuf], removed: &[PathBuf]) -> Self {
        let changes = changed
            .iter()
            .map(|file| FileChange::modified(absolutize(base, file)))
            .chain(removed.iter().map(|file| FileChange::removed(absolutize(base, file))))
            .collect();
        Self { changes }
    }

    /// Read a JSON array of `{"file": ..., "change": "added|modified|removed"}`
    pub fn from_json(base: &Path, path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read deltas from {}", path.display()))?;
        let entries: Vec<DeltaEntry> = serde_json::from_str(&content)
            .with_context(|| format!("invalid deltas file {}", path.display()))?;
        let changes = entries
            .into_iter()
            .map(|entry| FileChange {
                file: absolutize(base, &entry.file),
                change: entry.change,
            })
            .collect();
        Ok(Self { changes })
    }

    /// Append more deltas
    pub fn extend(&mut self, other: Self) {
        self.changes.extend(other.changes);
    }

    /// The deltas as given
    #[must_use]
    pub fn entries(&self) -> &[FileChange] {
        &self.changes
    }
}

impl DeltaSource for ExplicitDeltas {
    fn changes(&self, _live: &BTreeSet<PathBuf>) -> anyhow::Result<Vec<FileChange>> {
        Ok(self.changes.clone())
    }

    fn describe(&self) -> &'static str {
        "explicit deltas"
    }
}

/// Resolve `file` against `base` so it compares equal to discovered paths
fn absolutize(base: &Path, file: &Path) -> PathBuf {
    let joined = base.join(file);
    if let Ok(canonical) = fs::canonicalize(&joined) {
        return canonical;
    }
    // Removed files cannot be canonicalized; normalize lexically instead.
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                out.pop();
            },
            other => out.push(other),
        }
    }
    out
}
