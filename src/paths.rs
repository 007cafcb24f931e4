//! Centralized path definitions for ktlint-cache
//!
//! ## Storage Layout
//!
//! ```text
//! project/
//! ├── .ktlint.toml                  # project configuration (optional)
//! └── build/ktlint/                 # state directory (`state_dir`)
//!     ├── records/
//!     │   ├── root-sha.bin          # run record, one per task identity
//!     │   └── scripts-sha.bin
//!     └── history/
//!         ├── root.json             # input snapshot after the last passing run
//!         └── scripts.json
//! ```

use std::path::{Path, PathBuf};

/// Project configuration filename
pub const CONFIG_FILE: &str = ".ktlint.toml";

/// State directory used when the config does not name one
pub const DEFAULT_STATE_DIR: &str = "build/ktlint";

/// Run record subdirectory
const RECORDS_DIR: &str = "records";

/// Input history subdirectory
const HISTORY_DIR: &str = "history";

/// Suffix of run record files
const RECORD_SUFFIX: &str = "-sha.bin";

/// Path to the configuration file of the project at `root`
#[must_use]
pub fn config_file(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Where per-task state lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    state_dir: PathBuf,
}

impl StateLayout {
    /// Layout rooted at `state_dir`, resolved against `root` when relative
    #[must_use]
    pub fn new(root: &Path, state_dir: &Path) -> Self {
        Self {
            state_dir: root.join(state_dir),
        }
    }

    /// The state directory
    #[must_use]
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Directory holding run records
    #[must_use]
    pub fn records_dir(&self) -> PathBuf {
        self.state_dir.join(RECORDS_DIR)
    }

    /// Directory holding input snapshots
    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.state_dir.join(HISTORY_DIR)
    }

    /// Run record file of a task
    #[must_use]
    pub fn record_file(&self, task: &str) -> PathBuf {
        self.records_dir().join(format!("{}{RECORD_SUFFIX}", file_stem(task)))
    }

    /// Input snapshot file of a task
    #[must_use]
    pub fn history_file(&self, task: &str) -> PathBuf {
        self.history_dir().join(format!("{}.json", file_stem(task)))
    }
}

/// Task name made safe for use as a file name
///
/// Not one-to-one: distinct names may share a stem.
#[must_use]
pub fn file_stem(task: &str) -> String {
    task.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
