//! Task identities
//!
//! Each task owns a disjoint slice of the project's sources and exactly one
//! run record. The registry is built from configuration; nothing here looks at
//! the filesystem.
//!
//! - `scripts` - `*.gradle.kts` build scripts outside every source set
//! - one task per source set when source sets are enabled
//! - `root` - every other recognized file when there are no source sets;
//!   with source sets it is the aggregate that runs all of them

use serde::Serialize;

use crate::config::{ConfigError, ProjectConfig};
use crate::core::models::RelativePath;
use crate::paths;

/// Name of the project-wide task
pub const ROOT_TASK: &str = "root";

/// Name of the build-script task
pub const SCRIPTS_TASK: &str = "scripts";

/// Suffix identifying build scripts
const SCRIPT_SUFFIX: &str = ".gradle.kts";

/// What a task covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskKind {
    /// All recognized sources not owned by `scripts`
    Root,
    /// Build scripts outside source sets
    Scripts,
    /// Sources under the given root-relative directories
    SourceSet {
        /// Directories of the source set
        dirs: Vec<String>,
    },
}

/// One task identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSpec {
    /// Name, also the stem of its state files
    pub name: String,
    /// Coverage
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl TaskSpec {
    /// Directories to scan, empty meaning the whole project
    #[must_use]
    pub fn scan_dirs(&self) -> &[String] {
        match &self.kind {
            TaskKind::SourceSet { dirs } => dirs,
            TaskKind::Root | TaskKind::Scripts => &[],
        }
    }
}

/// All task identities of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRegistry {
    tasks: Vec<TaskSpec>,
}

impl TaskRegistry {
    /// Build the registry described by `config`
    pub fn from_config(config: &ProjectConfig) -> Result<Self, ConfigError> {
        let mut tasks = vec![TaskSpec {
            name: SCRIPTS_TASK.to_string(),
            kind: TaskKind::Scripts,
        }];

        let source_sets = config.effective_source_sets();
        if source_sets.is_empty() {
            tasks.push(TaskSpec {
                name: ROOT_TASK.to_string(),
                kind: TaskKind::Root,
            });
        }

        for set in source_sets {
            // Names sharing a state file stem would share one record
            let stem = paths::file_stem(&set.name);
            if stem == paths::file_stem(ROOT_TASK) || tasks.iter().any(|task| paths::file_stem(&task.name) == stem) {
                return Err(ConfigError::DuplicateTask(set.name));
            }
            let dirs = set.dirs.iter().map(|dir| RelativePath::new(dir).as_str().to_string()).collect();
            tasks.push(TaskSpec {
                name: set.name,
                kind: TaskKind::SourceSet { dirs },
            });
        }

        Ok(Self { tasks })
    }

    /// Every task with its own record
    #[must_use]
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Look up a task by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// Whether a `root` task has its own record
    #[must_use]
    pub fn has_root_task(&self) -> bool {
        self.get(ROOT_TASK).is_some()
    }

    /// Tasks to run for a requested name
    ///
    /// No name, or `root`, selects every task with `scripts` first.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<&TaskSpec>, ConfigError> {
        match name {
            None | Some(ROOT_TASK) => Ok(self.tasks.iter().collect()),
            Some(name) => self
                .get(name)
                .map(|task| vec![task])
                .ok_or_else(|| ConfigError::UnknownTask(name.to_string())),
        }
    }

    /// Whether `task` owns the root-relative `path`
    #[must_use]
    pub fn owns(&self, task: &TaskSpec, path: &RelativePath) -> bool {
        match &task.kind {
            TaskKind::SourceSet { dirs } => dirs.iter().any(|dir| path.is_under(dir)),
            TaskKind::Scripts => self.owns_script(path),
            TaskKind::Root => !self.owns_script(path),
        }
    }

    fn owns_script(&self, path: &RelativePath) -> bool {
        path.ends_with(SCRIPT_SUFFIX) && !self.in_source_set(path)
    }

    fn in_source_set(&self, path: &RelativePath) -> bool {
        self.tasks.iter().any(|task| match &task.kind {
            TaskKind::SourceSet { dirs } => dirs.iter().any(|dir| path.is_under(dir)),
            TaskKind::Root | TaskKind::Scripts => false,
        })
    }
}
