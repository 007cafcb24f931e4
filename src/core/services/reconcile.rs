//! Record reconciliation after a batch

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::models::{BatchOutcome, Digest, Mode, RelativePath, RunRecord};

/// What a batch did, as far as the record is concerned
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// Lint or format
    pub mode: Mode,
    /// Files handed to the engine
    pub processed: &'a [PathBuf],
    /// What the engine reported
    pub outcome: &'a BatchOutcome,
}

/// Build the record to persist after a batch
///
/// Previous fingerprints survive for files that are still live. Every
/// processed file that did not fail is re-fingerprinted; failed or vanished
/// files lose their entry so the next run picks them up again. After a format
/// batch the changed list becomes exactly the files with a fixed result; a
/// lint batch keeps the previous list for files that are still live.
#[must_use]
pub fn reconcile(
    root: &Path,
    previous: Option<&RunRecord>,
    live: &BTreeSet<PathBuf>,
    batch: Batch<'_>,
) -> RunRecord {
    reconcile_with(root, previous, live, batch, crate::fingerprint::fingerprint)
}

/// [`reconcile`] with a caller-supplied digest function
pub fn reconcile_with<F>(
    root: &Path,
    previous: Option<&RunRecord>,
    live: &BTreeSet<PathBuf>,
    batch: Batch<'_>,
    current_digest: F,
) -> RunRecord
where
    F: Fn(&Path) -> io::Result<Digest>,
{
    let live_relative: BTreeSet<RelativePath> =
        live.iter().filter_map(|file| RelativePath::from_root(root, file)).collect();

    let mut next = RunRecord::new();
    if let Some(previous) = previous {
        for (path, digest) in previous.fingerprints() {
            if live_relative.contains(path) {
                next.insert_fingerprint(path.clone(), *digest);
            }
        }
        if batch.mode == Mode::Lint {
            for path in previous.changed_paths().iter().filter(|path| live_relative.contains(*path)) {
                next.mark_changed(path.clone());
            }
        }
    }

    let failed: BTreeSet<&Path> = batch.outcome.failures.iter().map(|f| f.file.as_path()).collect();

    for file in batch.processed {
        let Some(path) = RelativePath::from_root(root, file) else {
            log::debug!("{} is outside {}, not recorded", file.display(), root.display());
            continue;
        };
        if failed.contains(file.as_path()) {
            next.remove(&path);
            continue;
        }
        match current_digest(file) {
            Ok(digest) => next.insert_fingerprint(path, digest),
            Err(e) => {
                log::debug!("dropping {path} from record: {e}");
                next.remove(&path);
            },
        }
    }

    for result in batch.outcome.results.iter().filter(|r| r.fixed) {
        if let Some(path) = RelativePath::from_root(root, &result.file) {
            next.mark_changed(path);
        }
    }

    next
}
