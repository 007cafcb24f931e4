//! Lint engine port
//!
//! The engine is a black box: given source text and the editor-config
//! properties that apply to it, report issues or produce corrected text.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::Properties;

/// Source handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Full file content
    pub text: String,
}

impl Code {
    /// Wrap file content
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// One issue found by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintError {
    /// 1-based line
    pub line: i32,
    /// 1-based column
    pub col: i32,
    /// Qualified rule id
    pub rule_id: String,
    /// Description
    pub detail: String,
    /// Whether formatting can fix it
    pub can_be_auto_corrected: bool,
}

/// Result of a format pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// Corrected source text
    pub text: String,
    /// Every issue seen, paired with whether it was corrected
    pub issues: Vec<(LintError, bool)>,
}

/// Errors raised by the engine for a single file
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The source could not be parsed
    #[error("parse error at {line}:{col}: {message}")]
    Parse {
        /// Line of the offending token
        line: i32,
        /// Column of the offending token
        col: i32,
        /// What went wrong
        message: String,
    },

    /// Unexpected fault inside the engine
    #[error("internal engine error: {0}")]
    Internal(String),
}

/// A lint/format engine
///
/// Implementations must be safe to call concurrently for different files.
pub trait LintEngine: Send + Sync + std::fmt::Debug {
    /// Engine name and version, for logs
    fn name(&self) -> &str;

    /// Report issues without changing anything
    fn lint(&self, code: &Code, properties: &Properties) -> Result<Vec<LintError>, EngineError>;

    /// Produce corrected text and the issues seen along the way
    fn format(&self, code: &Code, properties: &Properties) -> Result<Formatted, EngineError>;
}
