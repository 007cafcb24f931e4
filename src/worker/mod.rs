//! Worker dispatch and isolation
//!
//! - [`protocol`] - request/response messages for process isolation
//! - [`dispatcher`] - in-process pool or child process
//! - [`wrapper`] - per-file engine invocation
//! - [`serve`] - the worker process entry point

pub mod dispatcher;
pub mod protocol;
pub mod serve;
pub mod wrapper;

pub use dispatcher::{DEFAULT_ENV_PASSTHROUGH, DispatchError, Dispatcher, Isolation, WorkerCommand, run_batch};
pub use protocol::{PROTOCOL_VERSION, WorkRequest, WorkResponse};
pub use serve::serve;
pub use wrapper::EngineWrapper;
