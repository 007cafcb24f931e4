//! Domain models for ktlint-cache
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Digest`] / [`ContentFingerprint`] - content hashes, the unit of change detection
//! - [`RunRecord`] - the durable per-task state
//! - [`FileChange`] - a delta reported by the host build
//! - [`DiagnosticResult`] - an issue reported by the lint engine
//! - [`EditorConfig`] - style configuration consumed by the engine

mod change;
mod diagnostic;
mod editorconfig;
mod fingerprint;
mod path;
mod record;

pub use change::{ChangeType, FileChange};
pub use diagnostic::{BatchOutcome, DiagnosticResult, FileFailure, Mode};
pub use editorconfig::{EditorConfig, Properties, Section};
pub use fingerprint::{ContentFingerprint, DIGEST_LEN, Digest};
pub use path::RelativePath;
pub use record::RunRecord;
