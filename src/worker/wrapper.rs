//! Engine wrapper
//!
//! Runs the engine over a batch, one file per task. Each file either yields
//! diagnostics or a [`FileFailure`]; nothing one file does can stop another.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::adapters::editorconfig::{self, EditorConfigCache};
use crate::core::models::{BatchOutcome, DiagnosticResult, FileFailure, Properties};
use crate::core::ports::{Code, LintEngine, LintError};

/// Per-batch driver around a [`LintEngine`]
#[derive(Debug, Clone)]
pub struct EngineWrapper {
    engine: Arc<dyn LintEngine>,
}

impl EngineWrapper {
    /// Wrap an engine
    #[must_use]
    pub fn new(engine: Arc<dyn LintEngine>) -> Self {
        Self { engine }
    }

    /// The wrapped engine's name
    #[must_use]
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Process a batch on the current rayon pool
    ///
    /// The editor-config location is resolved once for the batch; loaded
    /// configs are shared between files for the duration of this call.
    #[must_use]
    pub fn run(&self, files: &[PathBuf], editor_config: Option<&Path>, auto_correct: bool) -> BatchOutcome {
        let config_path = editorconfig::locate(editor_config, files);
        if let Some(path) = &config_path {
            log::debug!("using editorconfig {}", path.display());
        }
        let cache = EditorConfigCache::new();

        let per_file: Vec<Result<Vec<DiagnosticResult>, FileFailure>> = files
            .par_iter()
            .map(|file| {
                let properties = Self::properties(&cache, config_path.as_deref(), file);
                panic::catch_unwind(AssertUnwindSafe(|| self.process(file, &properties, auto_correct)))
                    .unwrap_or_else(|_| Err(FileFailure::new(file, "engine panicked")))
            })
            .collect();

        let mut outcome = BatchOutcome::default();
        for result in per_file {
            match result {
                Ok(results) => outcome.results.extend(results),
                Err(failure) => {
                    log::error!("{}: {}", failure.file.display(), failure.message);
                    outcome.failures.push(failure);
                },
            }
        }
        outcome.sort();
        outcome
    }

    fn properties(cache: &EditorConfigCache, config_path: Option<&Path>, file: &Path) -> Properties {
        let Some(path) = config_path else {
            return Properties::default();
        };
        match cache.get_or_load(path) {
            Ok(config) => config.properties_for(file),
            Err(e) => {
                log::warn!("{e}, using engine defaults");
                Properties::default()
            },
        }
    }

    fn process(
        &self,
        file: &Path,
        properties: &Properties,
        auto_correct: bool,
    ) -> Result<Vec<DiagnosticResult>, FileFailure> {
        let text = fs::read_to_string(file).map_err(|e| FileFailure::new(file, format!("cannot read: {e}")))?;
        let code = Code::new(file, text);
        let to_result = |error: LintError, fixed: bool| DiagnosticResult {
            fixed,
            file: file.to_path_buf(),
            line: error.line,
            col: error.col,
            rule_id: error.rule_id,
            detail: error.detail,
        };

        if !auto_correct {
            let errors = self
                .engine
                .lint(&code, properties)
                .map_err(|e| FileFailure::new(file, e.to_string()))?;
            return Ok(errors.into_iter().map(|error| to_result(error, false)).collect());
        }

        let formatted = self
            .engine
            .format(&code, properties)
            .map_err(|e| FileFailure::new(file, e.to_string()))?;
        if formatted.text != code.text {
            fs::write(file, &formatted.text)
                .map_err(|e| FileFailure::new(file, format!("cannot write: {e}")))?;
            log::debug!("rewrote {}", file.display());
        }
        Ok(formatted.issues.into_iter().map(|(error, fixed)| to_result(error, fixed)).collect())
    }
}
