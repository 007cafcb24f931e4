//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::models::Mode;
use crate::runner::TaskOutcome;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a lint or format invocation
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Lint or format
    pub mode: Mode,
    /// Whether every task passed
    pub passed: bool,
    /// Per-task outcomes, in run order
    pub tasks: Vec<TaskOutcome>,
}

impl RunSummary {
    /// Summarize task outcomes
    #[must_use]
    pub fn new(mode: Mode, tasks: Vec<TaskOutcome>) -> Self {
        let passed = tasks.iter().all(|task| task.passed);
        Self { mode, passed, tasks }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        for task in &self.tasks {
            print!("{}", task.report);
            if let Some(message) = task.failure_message() {
                eprintln!("{}: {message}", task.task);
            }
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Persisted state of one task
#[derive(Debug, Serialize)]
pub struct TaskStatus {
    /// Task name
    pub task: String,
    /// Whether a readable run record exists
    pub has_record: bool,
    /// When the record was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_at: Option<DateTime<Utc>>,
    /// Fingerprinted files in the record
    pub fingerprints: usize,
    /// Files the last format pass rewrote
    pub changed_paths: Vec<String>,
    /// Source files the task currently owns
    pub live_files: usize,
    /// Whether the next run would process nothing: every live file matches
    /// both its recorded digest and the committed input history
    pub up_to_date: bool,
}

/// Result of a status query
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Project root
    pub root: String,
    /// One entry per task
    pub tasks: Vec<TaskStatus>,
}

impl StatusReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        println!("Project: {}\n", self.root);
        for task in &self.tasks {
            let state = if !task.has_record {
                "no record"
            } else if task.up_to_date {
                "up to date"
            } else {
                "stale"
            };
            println!("{} ({state})", task.task);
            println!("  live files:   {}", task.live_files);
            println!("  fingerprints: {}", task.fingerprints);
            if let Some(written_at) = task.written_at {
                println!("  written at:   {}", written_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if !task.changed_paths.is_empty() {
                println!("  changed by last format:");
                for path in &task.changed_paths {
                    println!("    {path}");
                }
            }
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => println!("{}", serde_json::to_string_pretty(self).unwrap_or_default()),
        }
    }
}
