//! Editor-config model
//!
//! Only the subset the engine needs: ordered sections keyed by glob, each with
//! lowercase `key = value` properties. Later matching sections win.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use super::RelativePath;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Properties that apply to one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Build from raw key/value pairs
    #[must_use]
    pub const fn new(values: BTreeMap<String, String>) -> Self {
        Self(values)
    }

    /// Raw value for a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Boolean value (`true`/`false`), `None` if absent or unparsable
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Numeric value, `None` if absent, `off`, or unparsable
    #[must_use]
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key)?.parse().ok()
    }

    /// Whether `ktlint_<ruleset>_<rule> = disabled` is set for a rule id
    #[must_use]
    pub fn is_rule_disabled(&self, rule_id: &str) -> bool {
        let key = format!("ktlint_{}", rule_id.replacen(':', "_", 1));
        self.get(&key).is_some_and(|value| value.eq_ignore_ascii_case("disabled"))
    }

    /// Set a value, replacing any previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Whether no properties are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A `[glob]` section
#[derive(Debug, Clone)]
pub struct Section {
    glob: String,
    patterns: Vec<Pattern>,
    properties: BTreeMap<String, String>,
}

impl Section {
    /// Compile a section header into match patterns
    ///
    /// Brace lists are expanded; globs without `/` match at any depth.
    #[must_use]
    pub fn new(glob: &str, properties: BTreeMap<String, String>) -> Self {
        let patterns = expand_braces(glob)
            .into_iter()
            .filter_map(|alternative| {
                let anchored = if alternative.contains('/') {
                    alternative.trim_start_matches('/').to_string()
                } else {
                    format!("**/{alternative}")
                };
                match Pattern::new(&anchored) {
                    Ok(pattern) => Some(pattern),
                    Err(e) => {
                        log::debug!("ignoring editorconfig section [{glob}]: {e}");
                        None
                    },
                }
            })
            .collect();

        Self {
            glob: glob.to_string(),
            patterns,
            properties,
        }
    }

    /// The section header as written
    #[must_use]
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// Properties declared in this section
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Whether the section applies to a path relative to the config directory
    #[must_use]
    pub fn matches(&self, relative: &RelativePath) -> bool {
        self.patterns.iter().any(|p| p.matches_with(relative.as_str(), MATCH_OPTIONS))
    }
}

/// A parsed `.editorconfig` file
#[derive(Debug, Clone)]
pub struct EditorConfig {
    path: PathBuf,
    root: bool,
    sections: Vec<Section>,
}

impl EditorConfig {
    /// Create from parsed parts
    #[must_use]
    pub const fn new(path: PathBuf, root: bool, sections: Vec<Section>) -> Self {
        Self {
            path,
            root,
            sections,
        }
    }

    /// Where the config was loaded from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the preamble declared `root = true`
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.root
    }

    /// Sections in file order
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Effective properties for `file`
    ///
    /// Files outside the config's directory get no properties.
    #[must_use]
    pub fn properties_for(&self, file: &Path) -> Properties {
        let mut properties = Properties::default();
        let Some(dir) = self.path.parent() else {
            return properties;
        };
        let Some(relative) = RelativePath::from_root(dir, file) else {
            return properties;
        };

        for section in self.sections.iter().filter(|s| s.matches(&relative)) {
            for (key, value) in &section.properties {
                properties.insert(key.clone(), value.clone());
            }
        }
        properties
    }
}

/// Expand `{a,b}` alternatives into separate globs
fn expand_braces(glob: &str) -> Vec<String> {
    let Some(open) = glob.find('{') else {
        return vec![glob.to_string()];
    };
    let Some(close) = glob[open..].find('}').map(|i| open + i) else {
        return vec![glob.to_string()];
    };
    let body = &glob[open + 1..close];
    if !body.contains(',') {
        return vec![glob.to_string()];
    }

    let (prefix, suffix) = (&glob[..open], &glob[close + 1..]);
    body.split(',')
        .flat_map(|alternative| expand_braces(&format!("{prefix}{alternative}{suffix}")))
        .collect()
}
