//! Build-system delta port

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::core::models::FileChange;

/// Supplier of the `(file, change)` tuples for one task invocation
pub trait DeltaSource {
    /// Deltas for the task's declared inputs
    ///
    /// `live` is the set of source files that currently exist for the task.
    fn changes(&self, live: &BTreeSet<PathBuf>) -> anyhow::Result<Vec<FileChange>>;

    /// Called after a passing run so the next invocation sees deltas relative to now
    fn commit(&self, _live: &BTreeSet<PathBuf>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Short label for logs
    fn describe(&self) -> &'static str;
}
