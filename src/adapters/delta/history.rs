//! Host input history
//!
//! Stands in for the build tool's own input tracking: a JSON snapshot of
//! every input's digest, taken after the last passing run. Deltas are the
//! difference between that snapshot and the files on disk now.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::models::{Digest, FileChange, RelativePath};
use crate::core::ports::DeltaSource;
use crate::fingerprint::{fingerprint, fingerprint_all};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    files: BTreeMap<RelativePath, Digest>,
}

/// Snapshot-based delta source for one task identity
#[derive(Debug, Clone)]
pub struct InputHistory {
    root: PathBuf,
    path: PathBuf,
}

impl InputHistory {
    /// History for sources under `root`, stored at `path`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
        }
    }

    /// Snapshot file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The committed snapshot, if any
    ///
    /// A missing or unreadable snapshot means the next run is non-incremental.
    #[must_use]
    pub fn load(&self) -> Option<BTreeMap<RelativePath, Digest>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("ignoring unreadable history {}: {e}", self.path.display());
                return None;
            },
        };
        match serde_json::from_str::<Snapshot>(&content) {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => Some(snapshot.files),
            Ok(snapshot) => {
                log::warn!("ignoring history version {} at {}", snapshot.version, self.path.display());
                None
            },
            Err(e) => {
                log::warn!("ignoring corrupt history {}: {e}", self.path.display());
                None
            },
        }
    }

    /// Forget the snapshot
    pub fn clear(&self) -> anyhow::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl DeltaSource for InputHistory {
    fn changes(&self, live: &BTreeSet<PathBuf>) -> anyhow::Result<Vec<FileChange>> {
        let Some(snapshot) = self.load() else {
            log::info!("no input history, processing all {} files", live.len());
            return Ok(live.iter().cloned().map(FileChange::added).collect());
        };

        let mut changes = Vec::new();
        let mut seen = BTreeSet::new();
        for file in live {
            let Some(path) = RelativePath::from_root(&self.root, file) else {
                continue;
            };
            match snapshot.get(&path) {
                None => changes.push(FileChange::added(file)),
                Some(previous) => match fingerprint(file) {
                    Ok(current) if current == *previous => {},
                    Ok(_) => changes.push(FileChange::modified(file)),
                    Err(e) => {
                        log::debug!("cannot fingerprint {path}: {e}");
                        changes.push(FileChange::modified(file));
                    },
                },
            }
            seen.insert(path);
        }

        changes.extend(
            snapshot
                .keys()
                .filter(|path| !seen.contains(*path))
                .map(|path| FileChange::removed(path.resolve(&self.root))),
        );
        Ok(changes)
    }

    fn commit(&self, live: &BTreeSet<PathBuf>) -> anyhow::Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            files: fingerprint_all(&self.root, live),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&snapshot)?)?;
        log::debug!("committed {} inputs to {}", snapshot.files.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "input history"
    }
}

/// Treat every live file as added, then commit like [`InputHistory`]
#[derive(Debug, Clone)]
pub struct Rerun {
    history: InputHistory,
}

impl Rerun {
    /// Force a full run, refreshing `history` afterwards
    #[must_use]
    pub const fn new(history: InputHistory) -> Self {
        Self { history }
    }
}

impl DeltaSource for Rerun {
    fn changes(&self, live: &BTreeSet<PathBuf>) -> anyhow::Result<Vec<FileChange>> {
        Ok(live.iter().cloned().map(FileChange::added).collect())
    }

    fn commit(&self, live: &BTreeSet<PathBuf>) -> anyhow::Result<()> {
        self.history.commit(live)
    }

    fn describe(&self) -> &'static str {
        "rerun"
    }
}
