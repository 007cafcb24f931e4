//! Root-relative source paths
//!
//! Every persisted path is stored relative to the project directory with `/`
//! separators, so state files stay valid when the project moves.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A `/`-separated path relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Normalize a relative path, dropping `.` components
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let parts: Vec<String> = path
            .as_ref()
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect();
        Self(parts.join("/"))
    }

    /// Relativize `file` against `root`, or `None` if it lies outside
    #[must_use]
    pub fn from_root(root: &Path, file: &Path) -> Option<Self> {
        file.strip_prefix(root).ok().map(Self::new)
    }

    /// The path as a `/`-separated string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve against `root` using platform separators
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.0.split('/').filter(|part| !part.is_empty()).fold(root.to_path_buf(), |acc, part| acc.join(part))
    }

    /// Whether the final component ends with `suffix`
    #[must_use]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }

    /// Whether this path lies under `dir` (a `/`-separated relative directory)
    #[must_use]
    pub fn is_under(&self, dir: &str) -> bool {
        let dir = dir.trim_matches('/');
        dir.is_empty()
            || self.0.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
