//! Lint diagnostics
//!
//! [`DiagnosticResult`] is the immutable value produced by the engine wrapper
//! for every issue found. Its derived ordering is the canonical sort key:
//! fixed-state, then file, then position, then rule id, then detail.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single issue reported by the lint engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiagnosticResult {
    /// Whether the engine corrected the issue
    pub fixed: bool,
    /// File the issue was found in
    pub file: PathBuf,
    /// 1-based line
    pub line: i32,
    /// 1-based column
    pub col: i32,
    /// Qualified rule id, e.g. `standard:no-empty-class-body`
    pub rule_id: String,
    /// Human-readable description
    pub detail: String,
}

impl DiagnosticResult {
    /// `file://<path>:<line>:<col>`
    #[must_use]
    pub fn link(&self) -> String {
        format!("file://{}:{}:{}", self.file.display(), self.line, self.col)
    }
}

/// A file the engine could not process at all
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileFailure {
    /// The offending file
    pub file: PathBuf,
    /// Why processing failed
    pub message: String,
}

impl FileFailure {
    /// Create a new failure
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// Everything one dispatched batch produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Diagnostics for every processed file
    pub results: Vec<DiagnosticResult>,
    /// Files that could not be processed
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    /// Fold another outcome into this one
    pub fn merge(&mut self, other: Self) {
        self.results.extend(other.results);
        self.failures.extend(other.failures);
    }

    /// Sort results and failures into canonical order
    pub fn sort(&mut self) {
        self.results.sort();
        self.failures.sort();
    }

    /// Number of results the engine did not fix
    #[must_use]
    pub fn unfixed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.fixed).count()
    }

    /// Whether nothing at all was reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.failures.is_empty()
    }
}

/// Lint-only or auto-correcting run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Report issues without touching files
    #[default]
    Lint,
    /// Rewrite files to fix what can be fixed
    Format,
}

impl Mode {
    /// Whether the engine should rewrite files
    #[must_use]
    pub const fn auto_correct(self) -> bool {
        matches!(self, Self::Format)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lint => write!(f, "lint"),
            Self::Format => write!(f, "format"),
        }
    }
}
