//! Build-system file deltas
//!
//! The host build reports which declared inputs were added, modified or removed
//! since the last successful invocation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of change reported for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// File is new since the last successful run
    Added,
    /// File content changed
    Modified,
    /// File no longer exists
    Removed,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

impl std::str::FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" | "add" => Ok(Self::Added),
            "modified" | "modify" | "changed" => Ok(Self::Modified),
            "removed" | "remove" | "deleted" => Ok(Self::Removed),
            _ => Err(format!("Invalid change type: {s}. Use: added, modified, removed")),
        }
    }
}

/// A single reported delta
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileChange {
    /// Absolute path of the changed file
    pub file: PathBuf,
    /// What happened to it
    pub change: ChangeType,
}

impl FileChange {
    /// An added file
    #[must_use]
    pub fn added(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            change: ChangeType::Added,
        }
    }

    /// A modified file
    #[must_use]
    pub fn modified(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            change: ChangeType::Modified,
        }
    }

    /// A removed file
    #[must_use]
    pub fn removed(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            change: ChangeType::Removed,
        }
    }

    /// Whether this delta is a removal
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.change == ChangeType::Removed
    }
}
