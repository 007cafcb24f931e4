//! Builtin rules
//!
//! Each rule reports [`LintError`]s against a lexed [`Source`]; autocorrecting
//! rules also know how to rewrite it.

use std::sync::LazyLock;

use regex::Regex;

use super::syntax::{Kind, Source};
use crate::core::models::Properties;
use crate::core::ports::LintError;

/// Default for `ij_kotlin_packages_to_use_import_on_demand`
const DEFAULT_IMPORT_ON_DEMAND: &str = "java.util.*,kotlinx.android.synthetic.**";

static CLASS_HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?:@[\w.]+(?:\([^)]*\))?|public|private|internal|protected|open|abstract|sealed|data|enum|annotation|inner|final|value|expect|actual|fun)\s+)*(?:class|object|interface)\s",
    )
    .ok()
});

/// A single lint rule
pub trait Rule: Send + Sync + std::fmt::Debug {
    /// Qualified id, e.g. `standard:final-newline`
    fn id(&self) -> &'static str;

    /// Whether [`Rule::fix`] can correct what [`Rule::check`] reports
    fn auto_correctable(&self) -> bool {
        false
    }

    /// Report violations
    fn check(&self, source: &Source<'_>, properties: &Properties) -> Vec<LintError>;

    /// Corrected text, or `None` when nothing changed
    fn fix(&self, _source: &Source<'_>, _properties: &Properties) -> Option<String> {
        None
    }
}

/// Every builtin rule, in application order
#[must_use]
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoEmptyClassBody),
        Box::new(NoTrailingSpaces),
        Box::new(NoConsecutiveBlankLines),
        Box::new(FinalNewline),
        Box::new(NoWildcardImports),
        Box::new(MaxLineLength),
    ]
}

fn error(rule: &dyn Rule, source: &Source<'_>, offset: usize, detail: impl Into<String>) -> LintError {
    let (line, col) = source.position(offset);
    LintError {
        line,
        col,
        rule_id: rule.id().to_string(),
        detail: detail.into(),
        can_be_auto_corrected: rule.auto_correctable(),
    }
}

// =============================================================================
// standard:no-empty-class-body
// =============================================================================

/// Flags `class A { }` and friends
#[derive(Debug, Clone, Copy)]
pub struct NoEmptyClassBody;

impl NoEmptyClassBody {
    /// `(header_end, open, close)` for every empty class body
    fn find(source: &Source<'_>) -> Vec<(usize, usize, usize)> {
        let Some(header) = CLASS_HEADER.as_ref() else {
            return Vec::new();
        };
        let text = source.text();
        let bytes = text.as_bytes();
        let mut found = Vec::new();

        for (open, _) in text.match_indices('{').filter(|(i, _)| source.is_code(*i)) {
            let rest = &text[open + 1..];
            let gap = rest.len() - rest.trim_start().len();
            let close = open + 1 + gap;
            if bytes.get(close) != Some(&b'}') || !source.is_code(close) {
                continue;
            }

            let boundary = text[..open]
                .char_indices()
                .rev()
                .find(|(i, c)| matches!(c, ';' | '{' | '}') && source.is_code(*i))
                .map_or(0, |(i, _)| i + 1);
            let declaration = source.code_only(boundary, open);

            // Last line of the span that opens a class-like declaration
            let Some(keyword_line) = std::iter::once(0)
                .chain(declaration.match_indices('\n').map(|(i, _)| i + 1))
                .rfind(|&start| header.is_match(&declaration[start..]))
            else {
                continue;
            };
            let before = declaration[..keyword_line].trim_end();
            if before.ends_with(['=', '(', ',', ':', '.']) || before.ends_with("return") {
                continue;
            }

            let header_end = text[..open].trim_end().len();
            found.push((header_end, open, close));
        }
        found
    }
}

impl Rule for NoEmptyClassBody {
    fn id(&self) -> &'static str {
        "standard:no-empty-class-body"
    }

    fn auto_correctable(&self) -> bool {
        true
    }

    fn check(&self, source: &Source<'_>, _properties: &Properties) -> Vec<LintError> {
        Self::find(source)
            .into_iter()
            .map(|(_, open, _)| error(self, source, open, "Unnecessary block (\"{}\")"))
            .collect()
    }

    fn fix(&self, source: &Source<'_>, _properties: &Properties) -> Option<String> {
        let found = Self::find(source);
        if found.is_empty() {
            return None;
        }
        let mut text = source.text().to_string();
        for (header_end, _, close) in found.into_iter().rev() {
            text.replace_range(header_end..=close, "");
        }
        Some(text)
    }
}

// =============================================================================
// standard:no-trailing-spaces
// =============================================================================

/// Flags whitespace at the end of a line outside string literals
#[derive(Debug, Clone, Copy)]
pub struct NoTrailingSpaces;

impl NoTrailingSpaces {
    /// Offset of the first trailing whitespace byte on each offending line
    fn find(source: &Source<'_>) -> Vec<(usize, usize)> {
        source
            .lines()
            .filter_map(|line| {
                let kept = line.content.trim_end_matches([' ', '\t']).len();
                let first = line.start + kept;
                (kept < line.content.len() && source.kind(first) != Kind::Str)
                    .then_some((first, line.start + line.content.len()))
            })
            .collect()
    }
}

impl Rule for NoTrailingSpaces {
    fn id(&self) -> &'static str {
        "standard:no-trailing-spaces"
    }

    fn auto_correctable(&self) -> bool {
        true
    }

    fn check(&self, source: &Source<'_>, _properties: &Properties) -> Vec<LintError> {
        Self::find(source)
            .into_iter()
            .map(|(first, _)| error(self, source, first, "Trailing space(s)"))
            .collect()
    }

    fn fix(&self, source: &Source<'_>, _properties: &Properties) -> Option<String> {
        let found = Self::find(source);
        if found.is_empty() {
            return None;
        }
        let mut text = source.text().to_string();
        for (first, end) in found.into_iter().rev() {
            text.replace_range(first..end, "");
        }
        Some(text)
    }
}

// =============================================================================
// standard:no-consecutive-blank-lines
// =============================================================================

/// Flags runs of more than one blank line
#[derive(Debug, Clone, Copy)]
pub struct NoConsecutiveBlankLines;

impl NoConsecutiveBlankLines {
    /// `(start, end)` byte ranges of every redundant blank line, terminator included
    fn find(source: &Source<'_>) -> Vec<(usize, usize)> {
        let text = source.text();
        let mut redundant = Vec::new();
        let mut run = 0;
        for line in source.lines() {
            let blank = line.content.trim().is_empty() && source.kind(line.start) == Kind::Code;
            if !blank {
                run = 0;
                continue;
            }
            run += 1;
            if run > 1 {
                let end = text[line.start..].find('\n').map_or(text.len(), |i| line.start + i + 1);
                redundant.push((line.start, end));
            }
        }
        redundant
    }
}

impl Rule for NoConsecutiveBlankLines {
    fn id(&self) -> &'static str {
        "standard:no-consecutive-blank-lines"
    }

    fn auto_correctable(&self) -> bool {
        true
    }

    fn check(&self, source: &Source<'_>, _properties: &Properties) -> Vec<LintError> {
        let mut errors = Vec::new();
        let mut previous_end = None;
        for (start, end) in Self::find(source) {
            // One report per run of blank lines
            if previous_end != Some(start) {
                errors.push(error(self, source, start, "Needless blank line(s)"));
            }
            previous_end = Some(end);
        }
        errors
    }

    fn fix(&self, source: &Source<'_>, _properties: &Properties) -> Option<String> {
        let found = Self::find(source);
        if found.is_empty() {
            return None;
        }
        let mut text = source.text().to_string();
        for (start, end) in found.into_iter().rev() {
            text.replace_range(start..end, "");
        }
        Some(text)
    }
}

// =============================================================================
// standard:final-newline
// =============================================================================

/// Enforces `insert_final_newline` (default `true`)
#[derive(Debug, Clone, Copy)]
pub struct FinalNewline;

impl Rule for FinalNewline {
    fn id(&self) -> &'static str {
        "standard:final-newline"
    }

    fn auto_correctable(&self) -> bool {
        true
    }

    fn check(&self, source: &Source<'_>, properties: &Properties) -> Vec<LintError> {
        let text = source.text();
        if text.is_empty() {
            return Vec::new();
        }
        let insert = properties.get_bool("insert_final_newline").unwrap_or(true);
        match (insert, text.ends_with('\n')) {
            (true, false) => vec![error(self, source, 0, "File must end with a newline (\\n)")],
            (false, true) => {
                let offset = text.trim_end_matches(['\n', '\r']).len();
                vec![error(self, source, offset, "Redundant newline (\\n) at the end of file")]
            },
            _ => Vec::new(),
        }
    }

    fn fix(&self, source: &Source<'_>, properties: &Properties) -> Option<String> {
        let text = source.text();
        if text.is_empty() {
            return None;
        }
        let insert = properties.get_bool("insert_final_newline").unwrap_or(true);
        match (insert, text.ends_with('\n')) {
            (true, false) => Some(format!("{text}\n")),
            (false, true) => Some(text.trim_end_matches(['\n', '\r']).to_string()),
            _ => None,
        }
    }
}

// =============================================================================
// standard:no-wildcard-imports
// =============================================================================

/// Flags `import a.b.*` unless the package is allowed on demand
#[derive(Debug, Clone, Copy)]
pub struct NoWildcardImports;

impl NoWildcardImports {
    fn allowed(package: &str, patterns: &str) -> bool {
        patterns.split(',').map(str::trim).any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix(".**") {
                package == prefix || package.starts_with(&format!("{prefix}."))
            } else if let Some(exact) = pattern.strip_suffix(".*") {
                package == exact
            } else {
                false
            }
        })
    }
}

impl Rule for NoWildcardImports {
    fn id(&self) -> &'static str {
        "standard:no-wildcard-imports"
    }

    fn check(&self, source: &Source<'_>, properties: &Properties) -> Vec<LintError> {
        let patterns = properties
            .get("ij_kotlin_packages_to_use_import_on_demand")
            .unwrap_or(DEFAULT_IMPORT_ON_DEMAND);

        source
            .lines()
            .filter_map(|line| {
                let indent = line.content.len() - line.content.trim_start().len();
                let offset = line.start + indent;
                let path = line.content.trim().strip_prefix("import ")?.trim();
                let package = path.strip_suffix(".*")?;
                (source.is_code(offset) && !Self::allowed(package, patterns))
                    .then(|| error(self, source, offset, "Wildcard import"))
            })
            .collect()
    }
}

// =============================================================================
// standard:max-line-length
// =============================================================================

/// Flags lines longer than `max_line_length`, when that is set
#[derive(Debug, Clone, Copy)]
pub struct MaxLineLength;

impl Rule for MaxLineLength {
    fn id(&self) -> &'static str {
        "standard:max-line-length"
    }

    fn check(&self, source: &Source<'_>, properties: &Properties) -> Vec<LintError> {
        let Some(max) = properties.get_usize("max_line_length").filter(|&max| max > 0) else {
            return Vec::new();
        };

        source
            .lines()
            .filter(|line| line.content.chars().count() > max)
            .filter(|line| source.kind(line.start) != Kind::Str)
            .filter(|line| {
                let trimmed = line.content.trim_start();
                !trimmed.starts_with("package ") && !trimmed.starts_with("import ")
            })
            .map(|line| error(self, source, line.start, format!("Exceeded max line length ({max})")))
            .collect()
    }
}
