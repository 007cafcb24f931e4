//! Worker dispatch
//!
//! Hands a batch to the engine either on a thread pool in this process or in
//! a separate worker process with its own environment. The call blocks until
//! the whole batch is done.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use thiserror::Error;

use super::protocol::{PROTOCOL_VERSION, WorkRequest, WorkResponse};
use super::wrapper::EngineWrapper;
use crate::core::models::BatchOutcome;
use crate::core::ports::LintEngine;

/// Environment variables a worker process inherits by default
pub const DEFAULT_ENV_PASSTHROUGH: &[&str] =
    &["PATH", "HOME", "TMPDIR", "TEMP", "TMP", "SYSTEMROOT", "RUST_LOG", "RUST_BACKTRACE"];

/// Errors dispatching a batch as a whole
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker could not be started
    #[error("cannot start worker {program}: {source}")]
    Spawn {
        /// Worker program
        program: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Talking to the worker failed
    #[error("worker i/o: {0}")]
    Io(#[from] io::Error),

    /// The worker exited unsuccessfully
    #[error("worker exited with {0}")]
    WorkerFailed(ExitStatus),

    /// The worker's reply was not a valid response
    #[error("malformed worker response: {0}")]
    Protocol(#[from] serde_json::Error),

    /// The worker speaks another protocol version
    #[error("worker protocol version {found}, expected {expected}")]
    VersionMismatch {
        /// Our version
        expected: u32,
        /// The worker's version
        found: u32,
    },

    /// The in-process pool could not be built
    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A worker executable and how to invoke it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<String>,
}

impl WorkerCommand {
    /// Run `program` with the default environment allowlist
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: DEFAULT_ENV_PASSTHROUGH.iter().map(ToString::to_string).collect(),
        }
    }

    /// This executable's hidden `worker` subcommand
    pub fn current_exe() -> io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?).with_args(["worker"]))
    }

    /// Build from an argv, e.g. a configured `worker.command`
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program).with_args(args.iter().cloned()))
    }

    /// Append arguments
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Let additional variables through to the worker
    #[must_use]
    pub fn with_env_passthrough(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for name in names {
            let name = name.into();
            if !self.env.contains(&name) {
                self.env.push(name);
            }
        }
        self
    }

    /// The worker program
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn environment(&self) -> Vec<(OsString, OsString)> {
        std::env::vars_os()
            .filter(|(name, _)| name.to_str().is_some_and(|name| self.env.iter().any(|allowed| allowed == name)))
            .collect()
    }
}

/// Where the engine runs
#[derive(Debug, Clone)]
pub enum Isolation {
    /// On a rayon pool inside this process
    InProcess(Arc<dyn LintEngine>),
    /// In a child process speaking the JSON protocol
    Process(WorkerCommand),
}

/// Sends batches to the engine
#[derive(Debug, Clone)]
pub struct Dispatcher {
    isolation: Isolation,
    threads: Option<usize>,
}

impl Dispatcher {
    /// Create a dispatcher
    #[must_use]
    pub const fn new(isolation: Isolation) -> Self {
        Self {
            isolation,
            threads: None,
        }
    }

    /// Limit the worker pool size
    #[must_use]
    pub const fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// How this dispatcher runs the engine
    #[must_use]
    pub const fn isolation(&self) -> &Isolation {
        &self.isolation
    }

    /// Lint or format `files`, returning once every file is done
    pub fn dispatch(
        &self,
        files: &[PathBuf],
        editor_config: Option<&Path>,
        auto_correct: bool,
    ) -> Result<BatchOutcome, DispatchError> {
        if files.is_empty() {
            return Ok(BatchOutcome::default());
        }
        log::debug!("dispatching {} files (auto_correct: {auto_correct})", files.len());

        match &self.isolation {
            Isolation::InProcess(engine) => {
                run_batch(Arc::clone(engine), files, editor_config, auto_correct, self.threads)
            },
            Isolation::Process(command) => {
                let request = WorkRequest::new(files.to_vec(), editor_config.map(Path::to_path_buf), auto_correct)
                    .with_threads(self.threads);
                spawn_worker(command, &request)
            },
        }
    }
}

/// Run a batch on a dedicated rayon pool in this process
pub fn run_batch(
    engine: Arc<dyn LintEngine>,
    files: &[PathBuf],
    editor_config: Option<&Path>,
    auto_correct: bool,
    threads: Option<usize>,
) -> Result<BatchOutcome, DispatchError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .thread_name(|i| format!("ktlint-worker-{i}"))
        .build()?;
    let wrapper = EngineWrapper::new(engine);
    log::debug!("running {} in process", wrapper.engine_name());
    Ok(pool.install(|| wrapper.run(files, editor_config, auto_correct)))
}

fn spawn_worker(command: &WorkerCommand, request: &WorkRequest) -> Result<BatchOutcome, DispatchError> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .env_clear()
        .envs(command.environment())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| DispatchError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(&serde_json::to_vec(request)?)?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(DispatchError::WorkerFailed(output.status));
    }

    let response: WorkResponse = serde_json::from_slice(&output.stdout)?;
    if response.version != PROTOCOL_VERSION {
        return Err(DispatchError::VersionMismatch {
            expected: PROTOCOL_VERSION,
            found: response.version,
        });
    }
    log::debug!("worker {} processed {} files", response.engine, request.files.len());
    Ok(response.outcome)
}
