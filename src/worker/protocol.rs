//! Worker wire protocol
//!
//! One JSON [`WorkRequest`] on the worker's stdin, one JSON [`WorkResponse`]
//! on its stdout. Logs go to stderr.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::models::BatchOutcome;

/// Bumped whenever either message changes shape
pub const PROTOCOL_VERSION: u32 = 1;

/// A batch of files to lint or format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequest {
    /// Protocol version of the sender
    pub version: u32,
    /// Absolute paths to process
    pub files: Vec<PathBuf>,
    /// Explicit editor-config file, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_config: Option<PathBuf>,
    /// Format instead of lint
    pub auto_correct: bool,
    /// Worker pool size, `None` for one thread per core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl WorkRequest {
    /// Request at the current protocol version
    #[must_use]
    pub fn new(files: Vec<PathBuf>, editor_config: Option<PathBuf>, auto_correct: bool) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            files,
            editor_config,
            auto_correct,
            threads: None,
        }
    }

    /// Limit the worker pool
    #[must_use]
    pub const fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}

/// What the worker produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResponse {
    /// Protocol version of the worker
    pub version: u32,
    /// Engine name and version
    pub engine: String,
    /// Results and per-file failures
    pub outcome: BatchOutcome,
}
