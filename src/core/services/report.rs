//! Result reporting
//!
//! Turns a batch's diagnostics into deterministic text and decides whether the
//! run passed. Two layouts are supported:
//!
//! - [`ReportStyle::Compact`]: one `file://path:line:col icon rule detail` line
//!   per diagnostic, file groups separated by a blank line
//! - [`ReportStyle::Table`]: a per-file block with aligned columns and wrapped
//!   detail text

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use colored::{ColoredString, Colorize};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::models::{BatchOutcome, DiagnosticResult, FileFailure, Mode};

static ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").ok());

const RULE_HEADER: &str = "RULE ID";
const DETAIL_HEADER: &str = "DETAIL";
const FILE_HEADER: &str = "FILE";
const ROW_INDENT: usize = 6;
const HEADER_INDENT: usize = 9;
const COLUMN_GAP: usize = 2;

/// Report layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    /// One line per diagnostic
    #[default]
    Compact,
    /// Aligned per-file table
    Table,
}

impl std::fmt::Display for ReportStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for ReportStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "table" | "block" => Ok(Self::Table),
            _ => Err(format!("Invalid report style: {s}. Use: compact, table")),
        }
    }
}

/// How to render a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Layout
    pub style: ReportStyle,
    /// Column at which table detail text wraps
    pub max_detail_width: usize,
    /// Emit ANSI colors
    pub color: bool,
    /// Root used to shorten table headers
    pub root: PathBuf,
}

impl ReportOptions {
    /// Plain compact output relative to `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            style: ReportStyle::Compact,
            max_detail_width: 60,
            color: false,
            root: root.into(),
        }
    }

    /// Use the given layout
    #[must_use]
    pub const fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    /// Wrap table detail text at `width`
    #[must_use]
    pub const fn with_max_detail_width(mut self, width: usize) -> Self {
        self.max_detail_width = width;
        self
    }

    /// Enable or disable colors
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Rendered report and verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Text for stdout, empty when there is nothing to say
    pub text: String,
    /// Whether the run passed
    pub passed: bool,
}

/// Render `outcome` and decide pass/fail
#[must_use]
pub fn report(outcome: &BatchOutcome, mode: Mode, options: &ReportOptions) -> Report {
    let mut text = match options.style {
        ReportStyle::Compact => compact(&outcome.results, options),
        ReportStyle::Table => table(&outcome.results, options),
    };

    if !outcome.failures.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&failures(&outcome.failures, options));
    }

    Report {
        text,
        passed: passed(outcome, mode),
    }
}

/// Whether a batch passes
///
/// Any per-file failure fails the run. Otherwise formatting fails on any
/// unfixed result and linting fails on any result at all.
#[must_use]
pub fn passed(outcome: &BatchOutcome, mode: Mode) -> bool {
    if !outcome.failures.is_empty() {
        return false;
    }
    match mode {
        Mode::Format => outcome.unfixed_count() == 0,
        Mode::Lint => outcome.results.is_empty(),
    }
}

/// Number of problems that make a batch fail
#[must_use]
pub fn error_count(outcome: &BatchOutcome, mode: Mode) -> usize {
    let diagnostics = match mode {
        Mode::Format => outcome.unfixed_count(),
        Mode::Lint => outcome.results.len(),
    };
    diagnostics + outcome.failures.len()
}

/// Summary line for a failed run
#[must_use]
pub fn failure_message(mode: Mode, errors: usize) -> String {
    format!("Ktlint {mode} finished with {errors} errors which were not fixed. Check log for details.")
}

/// Remove ANSI escape sequences
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(text, ""),
        None => Cow::Borrowed(text),
    }
}

/// Greedy word wrap
///
/// Words are never split; a word longer than `max` gets a line of its own.
#[must_use]
pub fn wrap_detail(detail: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in detail.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn by_file(results: &[DiagnosticResult]) -> BTreeMap<&Path, Vec<&DiagnosticResult>> {
    let mut groups: BTreeMap<&Path, Vec<&DiagnosticResult>> = BTreeMap::new();
    for result in results {
        groups.entry(result.file.as_path()).or_default().push(result);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| {
            (a.line, a.col, &a.rule_id, &a.detail, a.fixed)
                .cmp(&(b.line, b.col, &b.rule_id, &b.detail, b.fixed))
        });
    }
    groups
}

fn compact(results: &[DiagnosticResult], options: &ReportOptions) -> String {
    let blocks: Vec<String> = by_file(results)
        .into_values()
        .map(|group| {
            group
                .into_iter()
                .map(|result| {
                    let (icon, rule) = if result.fixed {
                        ("✅", options.paint(&result.rule_id, |s| s.bright_green()))
                    } else {
                        ("❌", options.paint(&result.rule_id, |s| s.bright_red()))
                    };
                    format!("{} {icon} {rule} {}\n", result.link(), result.detail.trim())
                })
                .collect()
        })
        .collect();
    blocks.join("\n")
}

fn pad(styled: &str, visible: usize, width: usize) -> String {
    format!("{styled}{}", " ".repeat(width.saturating_sub(visible)))
}

fn table(results: &[DiagnosticResult], options: &ReportOptions) -> String {
    let blocks: Vec<String> = by_file(results)
        .into_iter()
        .map(|(file, group)| table_block(file, &group, options))
        .collect();
    blocks.join("\n")
}

fn table_block(file: &Path, group: &[&DiagnosticResult], options: &ReportOptions) -> String {
    let wrapped: Vec<Vec<String>> = group
        .iter()
        .map(|result| wrap_detail(&result.detail, options.max_detail_width))
        .collect();

    let rule_width = group
        .iter()
        .map(|r| r.rule_id.chars().count())
        .chain([RULE_HEADER.len()])
        .max()
        .unwrap_or(RULE_HEADER.len())
        + COLUMN_GAP;
    let detail_width = wrapped
        .iter()
        .flatten()
        .map(|line| line.chars().count())
        .chain([DETAIL_HEADER.len()])
        .max()
        .unwrap_or(DETAIL_HEADER.len())
        + COLUMN_GAP;

    let shown = file.strip_prefix(&options.root).unwrap_or(file);
    let mut out = format!("   file: {}\n", options.paint(&shown.display().to_string(), |s| s.bold()));

    out.push_str(&" ".repeat(HEADER_INDENT));
    out.push_str(&pad(&options.paint(RULE_HEADER, |s| s.underline()), RULE_HEADER.len(), rule_width));
    out.push_str(&pad(
        &options.paint(DETAIL_HEADER, |s| s.underline()),
        DETAIL_HEADER.len(),
        detail_width,
    ));
    out.push_str(&options.paint(FILE_HEADER, |s| s.underline()));
    out.push('\n');

    for (result, lines) in group.iter().zip(&wrapped) {
        let icon = if result.fixed {
            options.paint("✔", |s| s.bright_green())
        } else {
            options.paint("✘", |s| s.bright_red())
        };
        let first = lines.first().map_or("", String::as_str);

        out.push_str(&" ".repeat(ROW_INDENT));
        out.push_str(&icon);
        out.push_str(&" ".repeat(COLUMN_GAP));
        out.push_str(&pad(&result.rule_id, result.rule_id.chars().count(), rule_width));
        out.push_str(&pad(first, first.chars().count(), detail_width));
        out.push_str(&options.paint(&format!("{}:", result.link()), |s| s.dimmed()));
        out.push('\n');

        for continuation in lines.iter().skip(1) {
            out.push_str(&" ".repeat(HEADER_INDENT + rule_width));
            out.push_str(continuation);
            out.push('\n');
        }
    }
    out
}

fn failures(failures: &[FileFailure], options: &ReportOptions) -> String {
    let mut out = options.paint("Files that could not be processed:", |s| s.bright_red().bold());
    out.push('\n');
    for failure in failures {
        out.push_str(&format!("  {}: {}\n", failure.file.display(), failure.message));
    }
    out
}
