//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the change-tracking core
//! and the things it does not own: the lint engine, durable state, and
//! the host build's delta tracking.
//!
//! Implementations live in the `adapters` module.

mod delta;
mod engine;
mod record_store;

pub use delta::DeltaSource;
pub use engine::{Code, EngineError, Formatted, LintEngine, LintError};
pub use record_store::RecordStore;
