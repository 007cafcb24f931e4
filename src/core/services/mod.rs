//! Business logic services
//!
//! Orchestration logic that operates on domain models.
//!
//! - [`resolver`] - decide which files a run must process
//! - [`reconcile`] - build the record to persist after a format batch
//! - [`report`] - render diagnostics and decide pass/fail

pub mod reconcile;
pub mod report;
pub mod resolver;

pub use reconcile::{Batch, reconcile, reconcile_with};
pub use report::{
    Report, ReportOptions, ReportStyle, error_count, failure_message, passed, report, strip_ansi,
    wrap_detail,
};
pub use resolver::{ChangeSet, ChangeSetResolver, ResolverConfig};
