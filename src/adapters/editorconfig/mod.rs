//! Editor-config location, parsing and caching

mod cache;
mod parser;

use std::path::{Path, PathBuf};

pub use cache::EditorConfigCache;
pub use parser::{EditorConfigError, load, parse};

/// Config file name searched for when no explicit path is given
pub const EDITORCONFIG_FILE: &str = ".editorconfig";

/// Resolve which editor-config file applies to a batch
///
/// An explicit path wins if it exists; a missing explicit path is reported and
/// ignored. Otherwise the nearest `.editorconfig` at or above the batch's
/// common parent directory is used.
#[must_use]
pub fn locate(explicit: Option<&Path>, files: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        log::warn!(
            "editorconfig {} does not exist, searching from the sources instead",
            path.display()
        );
    }

    let start = common_parent(files)?;
    start.ancestors().map(|dir| dir.join(EDITORCONFIG_FILE)).find(|candidate| candidate.is_file())
}

/// Deepest directory containing every file
#[must_use]
pub fn common_parent(files: &[PathBuf]) -> Option<PathBuf> {
    let mut iter = files.iter().filter_map(|file| file.parent());
    let mut common = iter.next()?.to_path_buf();
    for dir in iter {
        while !dir.starts_with(&common) {
            if !common.pop() {
                return None;
            }
        }
    }
    Some(common)
}
