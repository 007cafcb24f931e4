//! Project context
//!
//! A [`Project`] bundles the root directory, its configuration and its task
//! registry. Every component that needs paths or patterns gets them from here
//! instead of looking them up globally.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::adapters::delta::InputHistory;
use crate::adapters::engine::BuiltinEngine;
use crate::adapters::record::FileRecordStore;
use crate::adapters::sources::SourceScanner;
use crate::config::{IsolationMode, ProjectConfig};
use crate::core::models::RelativePath;
use crate::core::services::{ChangeSetResolver, ReportOptions, ResolverConfig};
use crate::paths::StateLayout;
use crate::task::{TaskRegistry, TaskSpec};
use crate::worker::{Dispatcher, Isolation, WorkerCommand};

/// A configured project
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
    tasks: TaskRegistry,
    layout: StateLayout,
}

impl Project {
    /// Open the project at `root`, loading `.ktlint.toml` if present
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("cannot open project directory {}", root.display()))?;
        let config = ProjectConfig::load(&root)?;
        Self::with_config(root, config)
    }

    /// Use an already loaded configuration
    pub fn with_config(root: PathBuf, config: ProjectConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let tasks = TaskRegistry::from_config(&config)?;
        let layout = StateLayout::new(&root, &config.state_dir);
        Ok(Self {
            root,
            config,
            tasks,
            layout,
        })
    }

    /// Project root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Task identities
    #[must_use]
    pub const fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// State file locations
    #[must_use]
    pub const fn layout(&self) -> &StateLayout {
        &self.layout
    }

    /// Every source file `task` currently owns
    pub fn live_files(&self, task: &TaskSpec) -> anyhow::Result<BTreeSet<PathBuf>> {
        let scanner = SourceScanner::new(
            &self.root,
            &self.config.source.extensions,
            self.config.exclude_patterns()?,
        );
        Ok(scanner
            .scan(task.scan_dirs())
            .into_iter()
            .filter(|file| {
                RelativePath::from_root(&self.root, file).is_some_and(|path| self.tasks.owns(task, &path))
            })
            .collect())
    }

    /// Resolver bound to this project's root and extensions
    #[must_use]
    pub fn resolver(&self) -> ChangeSetResolver {
        ChangeSetResolver::new(ResolverConfig::new(
            self.root.clone(),
            self.config.source.extensions.iter().cloned(),
        ))
    }

    /// The run record of `task`
    #[must_use]
    pub fn record_store(&self, task: &TaskSpec) -> FileRecordStore {
        FileRecordStore::new(self.layout.record_file(&task.name))
    }

    /// The input history of `task`
    #[must_use]
    pub fn history(&self, task: &TaskSpec) -> InputHistory {
        InputHistory::new(self.root.clone(), self.layout.history_file(&task.name))
    }

    /// Configured editor-config path, resolved against the root
    #[must_use]
    pub fn editor_config(&self) -> Option<PathBuf> {
        self.config.editorconfig.path.as_ref().map(|path| self.root.join(path))
    }

    /// Dispatcher per `[worker]`, or in-process when `in_process` is set
    pub fn dispatcher(&self, in_process: bool) -> anyhow::Result<Dispatcher> {
        let worker = &self.config.worker;
        let isolation = if in_process || worker.isolation == IsolationMode::InProcess {
            Isolation::InProcess(Arc::new(BuiltinEngine::new()))
        } else {
            let command = match WorkerCommand::from_argv(&worker.command) {
                Some(command) => command,
                None => WorkerCommand::current_exe().context("cannot locate worker executable")?,
            };
            Isolation::Process(command.with_env_passthrough(worker.env.iter().cloned()))
        };
        Ok(Dispatcher::new(isolation).with_threads(worker.threads))
    }

    /// Report rendering options per `[report]`
    #[must_use]
    pub fn report_options(&self) -> ReportOptions {
        let report = &self.config.report;
        ReportOptions::new(self.root.clone())
            .with_style(report.style)
            .with_max_detail_width(report.max_detail_width)
            .with_color(report.color.enabled())
    }
}
