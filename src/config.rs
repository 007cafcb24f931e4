//! Project configuration
//!
//! Loaded from `.ktlint.toml` at the project root. Every section is optional;
//! a missing file means defaults, a malformed one is an error.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::services::ReportStyle;
use crate::paths;

/// Errors loading or validating the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("invalid {path}: {source}")]
    Parse {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// An exclusion glob does not compile
    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidGlob {
        /// The pattern as written
        pattern: String,
        /// Underlying error
        #[source]
        source: glob::PatternError,
    },

    /// Two source sets share a name or state file, or one uses a reserved name
    #[error("duplicate or reserved task name: {0}")]
    DuplicateTask(String),

    /// A task was requested that does not exist
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// Some other setting is out of range
    #[error("{0}")]
    Invalid(String),
}

/// Full project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// State directory, relative to the project root
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Which files are sources
    #[serde(default)]
    pub source: SourceConfig,
    /// Host capabilities
    #[serde(default)]
    pub features: Features,
    /// Source sets, one task each when `features.kotlin_source_sets` is on
    #[serde(default, rename = "source_set", skip_serializing_if = "Vec::is_empty")]
    pub source_sets: Vec<SourceSetConfig>,
    /// Editor-config override
    #[serde(default)]
    pub editorconfig: EditorConfigSettings,
    /// Worker dispatch
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Reporting
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_STATE_DIR)
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            source: SourceConfig::default(),
            features: Features::default(),
            source_sets: Vec::new(),
            editorconfig: EditorConfigSettings::default(),
            worker: WorkerConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// `[source]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Recognized extensions, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Root-relative globs that are never scanned
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["kt".to_string(), "kts".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["build/**".to_string(), ".gradle/**".to_string(), ".git/**".to_string()]
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
        }
    }
}

/// `[features]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Features {
    /// The host build has Kotlin source sets
    #[serde(default)]
    pub kotlin_source_sets: bool,
}

/// `[[source_set]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSetConfig {
    /// Task name
    pub name: String,
    /// Root-relative source directories
    pub dirs: Vec<String>,
}

/// `[editorconfig]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditorConfigSettings {
    /// Explicit config file, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// How the engine is isolated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsolationMode {
    /// Child process with its own environment
    #[default]
    Process,
    /// Thread pool in the calling process
    InProcess,
}

/// `[worker]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Isolation mode
    #[serde(default)]
    pub isolation: IsolationMode,
    /// Worker argv; empty means this executable's `worker` subcommand
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Pool size, one thread per core when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Extra environment variables passed to the worker
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
}

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// When stdout is a terminal
    #[default]
    Auto,
    /// Always
    Always,
    /// Never
    Never,
}

impl ColorChoice {
    /// Resolve against the current stdout
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// `[report]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Layout
    #[serde(default)]
    pub style: ReportStyle,
    /// Wrap column for table details
    #[serde(default = "default_max_detail_width")]
    pub max_detail_width: usize,
    /// Colors
    #[serde(default)]
    pub color: ColorChoice,
}

const fn default_max_detail_width() -> usize {
    60
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            style: ReportStyle::default(),
            max_detail_width: default_max_detail_width(),
            color: ColorChoice::default(),
        }
    }
}

impl ProjectConfig {
    /// Load the config for the project at `root`
    ///
    /// A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = paths::config_file(root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no {} in {}, using defaults", paths::CONFIG_FILE, root.display());
                return Ok(Self::default());
            },
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.extensions.is_empty() {
            return Err(ConfigError::Invalid("source.extensions must not be empty".to_string()));
        }
        if self.report.max_detail_width == 0 {
            return Err(ConfigError::Invalid("report.max_detail_width must be positive".to_string()));
        }
        if self.worker.threads == Some(0) {
            return Err(ConfigError::Invalid("worker.threads must be positive".to_string()));
        }
        self.exclude_patterns()?;
        Ok(())
    }

    /// Compiled `source.exclude` globs
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        self.source
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Source sets in effect: configured ones, or `main`/`test` defaults
    ///
    /// Empty unless `features.kotlin_source_sets` is set.
    #[must_use]
    pub fn effective_source_sets(&self) -> Vec<SourceSetConfig> {
        if !self.features.kotlin_source_sets {
            return Vec::new();
        }
        if !self.source_sets.is_empty() {
            return self.source_sets.clone();
        }
        ["main", "test"]
            .into_iter()
            .map(|name| SourceSetConfig {
                name: name.to_string(),
                dirs: vec![format!("src/{name}/kotlin"), format!("src/{name}/java")],
            })
            .collect()
    }

    /// Commented starter file written by `init`
    #[must_use]
    pub fn template() -> String {
        format!(
            r#"# ktlint-cache configuration

# Where run records and input history are kept
state_dir = "{state_dir}"

[source]
extensions = ["kt", "kts"]
exclude = ["build/**", ".gradle/**", ".git/**"]

[features]
# One task per source set instead of a single root task
kotlin_source_sets = false

# [[source_set]]
# name = "main"
# dirs = ["src/main/kotlin"]

# [editorconfig]
# path = ".editorconfig"

[worker]
# "process" runs the engine in a separate worker process
isolation = "process"

[report]
style = "compact"
max_detail_width = 60
color = "auto"
"#,
            state_dir = paths::DEFAULT_STATE_DIR
        )
    }
}
