//! Source discovery
//!
//! Walks the project for files with recognized extensions, skipping hidden
//! directories and configured exclusions.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::core::models::RelativePath;

/// Recursive scanner over a project root
#[derive(Debug, Clone)]
pub struct SourceScanner {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<Pattern>,
}

impl SourceScanner {
    /// Scan `root` for the given extensions
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, extensions: &[String], exclude: Vec<Pattern>) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.to_vec(),
            exclude,
        }
    }

    /// Whether a root-relative path matches an exclusion
    #[must_use]
    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        let dir_glob = format!("{path}/");
        self.exclude
            .iter()
            .any(|pattern| pattern.matches(path.as_str()) || pattern.matches(&dir_glob))
    }

    /// Every recognized file under `dirs` (relative to the root), sorted
    ///
    /// An empty `dirs` scans the whole root.
    #[must_use]
    pub fn scan(&self, dirs: &[String]) -> BTreeSet<PathBuf> {
        let starts: Vec<PathBuf> = if dirs.is_empty() {
            vec![self.root.clone()]
        } else {
            dirs.iter().map(|dir| RelativePath::new(dir).resolve(&self.root)).collect()
        };

        starts
            .iter()
            .filter(|start| start.is_dir())
            .flat_map(|start| {
                WalkDir::new(start)
                    .follow_links(false)
                    .into_iter()
                    .filter_entry(|entry| self.keep(entry))
                    .filter_map(|entry| match entry {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            log::debug!("skipping unreadable entry: {e}");
                            None
                        },
                    })
            })
            .filter(|entry| entry.file_type().is_file() && self.is_recognized(entry.path()))
            .map(DirEntry::into_path)
            .collect()
    }

    fn is_recognized(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    fn keep(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let hidden = entry.file_name().to_str().is_some_and(|name| name.starts_with('.'));
        if hidden && entry.file_type().is_dir() {
            return false;
        }
        RelativePath::from_root(&self.root, entry.path()).is_none_or(|path| !self.is_excluded(&path))
    }
}
