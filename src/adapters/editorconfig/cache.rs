//! Per-dispatch editor-config cache
//!
//! Populated with compute-if-absent semantics: a miss parses outside the
//! lock, and the first value inserted for a path wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::parser::{self, EditorConfigError};
use crate::core::models::EditorConfig;

/// Loaded configs keyed by resolved path
#[derive(Debug, Default)]
pub struct EditorConfigCache {
    entries: Mutex<HashMap<PathBuf, Arc<EditorConfig>>>,
}

impl EditorConfigCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached config for `path`, loading it on first use
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<EditorConfig>, EditorConfigError> {
        if let Some(hit) = self.lock().get(path) {
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(parser::load(path)?);
        log::debug!("loaded editorconfig {}", path.display());
        Ok(Arc::clone(self.lock().entry(path.to_path_buf()).or_insert(loaded)))
    }

    /// Number of cached configs
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<EditorConfig>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
