//! Task invocation
//!
//! One run of one task: compute the live sources, load the previous record,
//! ask the delta source what changed, resolve the change set, dispatch it,
//! report, then persist the reconciled record. The record is written only
//! after the batch has fully completed, so an interrupted run leaves the
//! previous one in place.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use crate::adapters::delta::{ExplicitDeltas, Rerun};
use crate::core::models::{BatchOutcome, Mode};
use crate::core::ports::{DeltaSource, RecordStore};
use crate::core::services::{Batch, error_count, failure_message, reconcile, report};
use crate::project::Project;
use crate::task::TaskSpec;
use crate::worker::Dispatcher;

/// Where a run's file deltas come from
#[derive(Debug, Clone, Default)]
pub enum Deltas {
    /// Compare against the input snapshot of the last passing run
    #[default]
    History,
    /// Deltas handed over by an outer build
    Explicit(ExplicitDeltas),
    /// Treat every live file as added
    Rerun,
}

/// What one task run did
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    /// Task name
    pub task: String,
    /// Lint or format
    pub mode: Mode,
    /// Delta source used
    pub deltas: &'static str,
    /// Number of live source files
    pub live_files: usize,
    /// Files handed to the engine, sorted
    pub processed: Vec<PathBuf>,
    /// Files included only to heal the previous record
    pub recovered: Vec<PathBuf>,
    /// Diagnostics and per-file failures
    #[serde(flatten)]
    pub outcome: BatchOutcome,
    /// Rendered report
    #[serde(skip)]
    pub report: String,
    /// Whether the task passed
    pub passed: bool,
    /// Problems that made it fail
    pub errors: usize,
    /// Whether a new record was persisted
    pub record_written: bool,
}

impl TaskOutcome {
    /// Failure summary, `None` when the task passed
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        (!self.passed).then(|| failure_message(self.mode, self.errors))
    }
}

/// Runs tasks of one project
#[derive(Debug)]
pub struct TaskRunner<'a> {
    project: &'a Project,
    dispatcher: Dispatcher,
    deltas: Deltas,
}

impl<'a> TaskRunner<'a> {
    /// Create a runner
    #[must_use]
    pub const fn new(project: &'a Project, dispatcher: Dispatcher, deltas: Deltas) -> Self {
        Self {
            project,
            dispatcher,
            deltas,
        }
    }

    /// Run every task in `tasks`, in order
    ///
    /// A task that fails to run at all aborts the remaining ones; a task that
    /// merely reports problems does not.
    pub fn run_all(&self, tasks: &[&TaskSpec], mode: Mode) -> anyhow::Result<Vec<TaskOutcome>> {
        tasks.iter().map(|task| self.run(task, mode)).collect()
    }

    /// Run one task
    pub fn run(&self, task: &TaskSpec, mode: Mode) -> anyhow::Result<TaskOutcome> {
        let live = self.project.live_files(task)?;
        let store = self.project.record_store(task);
        let previous = store.load();

        let source = self.delta_source(task, previous.is_some());
        let deltas = source
            .changes(&live)
            .with_context(|| format!("cannot compute deltas for task {}", task.name))?;
        log::debug!("{}: {} deltas from {}", task.name, deltas.len(), source.describe());

        let change_set = self.project.resolver().resolve(&deltas, previous.as_ref(), &live);
        let files = change_set.to_vec();
        if files.is_empty() {
            log::info!("{}: nothing to {mode}", task.name);
        } else {
            log::info!("{}: {mode} {} of {} files", task.name, files.len(), live.len());
        }

        let editor_config = self.project.editor_config();
        let outcome = self
            .dispatcher
            .dispatch(&files, editor_config.as_deref(), mode.auto_correct())
            .with_context(|| format!("{mode} failed for task {}", task.name))?;

        let rendered = report(&outcome, mode, &self.project.report_options());

        let record_written = !files.is_empty();
        if record_written {
            let next = reconcile(
                self.project.root(),
                previous.as_ref(),
                &live,
                Batch {
                    mode,
                    processed: &files,
                    outcome: &outcome,
                },
            );
            store.save(&next)?;
        }

        if rendered.passed {
            source.commit(&live)?;
        } else {
            log::debug!("{}: not committing {}", task.name, source.describe());
        }

        Ok(TaskOutcome {
            task: task.name.clone(),
            mode,
            deltas: source.describe(),
            live_files: live.len(),
            recovered: change_set.recovered().iter().cloned().collect(),
            processed: files,
            errors: error_count(&outcome, mode),
            outcome,
            report: rendered.text,
            passed: rendered.passed,
            record_written,
        })
    }

    fn delta_source(&self, task: &TaskSpec, has_record: bool) -> Box<dyn DeltaSource> {
        match &self.deltas {
            Deltas::History if has_record => Box::new(self.project.history(task)),
            Deltas::History => {
                log::info!("{}: no run record, processing every source file", task.name);
                Box::new(Rerun::new(self.project.history(task)))
            },
            Deltas::Explicit(explicit) => Box::new(explicit.clone()),
            Deltas::Rerun => Box::new(Rerun::new(self.project.history(task))),
        }
    }
}
