//! ktlint-cache - incremental lint and format runs for Kotlin sources
//!
//! Only files that changed since the last successful run are handed to the
//! lint engine. A per-task run record of content digests lets a run pick up
//! files a previous format pass rewrote, even when the host build lost track
//! of them.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod fingerprint;
pub mod output;
pub mod paths;
pub mod project;
pub mod runner;
pub mod task;
pub mod worker;
