//! Change-tracking core
//!
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Digest, RunRecord, FileChange, DiagnosticResult)
//! - `services/` - Change-set resolution, reconciliation, reporting
//! - `ports/` - Trait definitions for the engine, state and delta sources

pub mod models;
pub mod ports;
pub mod services;
