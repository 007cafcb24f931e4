//! `.editorconfig` parsing
//!
//! Lenient: unknown syntax is skipped with a debug log, never an error.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::models::{EditorConfig, Section};

/// Errors loading an editor-config file
#[derive(Debug, Error)]
pub enum EditorConfigError {
    /// The file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// The config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// Read and parse the file at `path`
pub fn load(path: &Path) -> Result<EditorConfig, EditorConfigError> {
    let content = fs::read_to_string(path).map_err(|source| EditorConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(path, &content))
}

/// Parse editor-config text that lives at `path`
#[must_use]
pub fn parse(path: &Path, content: &str) -> EditorConfig {
    let mut root = false;
    let mut sections = Vec::new();
    let mut current: Option<(String, BTreeMap<String, String>)> = None;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(glob) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            if let Some((glob, properties)) = current.take() {
                sections.push(Section::new(&glob, properties));
            }
            current = Some((glob.trim().to_string(), BTreeMap::new()));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            log::debug!("{}:{}: skipping `{line}`", path.display(), index + 1);
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim().to_string();

        match current.as_mut() {
            Some((_, properties)) => {
                properties.insert(key, value);
            },
            None if key == "root" => root = value.eq_ignore_ascii_case("true"),
            None => log::debug!("{}:{}: ignoring preamble key {key}", path.display(), index + 1),
        }
    }

    if let Some((glob, properties)) = current {
        sections.push(Section::new(&glob, properties));
    }

    EditorConfig::new(path.to_path_buf(), root, sections)
}
