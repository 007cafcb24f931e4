//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `record/` - binary run-record files
//! - `delta/` - host input history, explicit deltas, reruns
//! - `editorconfig/` - `.editorconfig` location, parsing and caching
//! - `engine/` - the builtin lint engine
//! - `sources` - source file discovery

pub mod delta;
pub mod editorconfig;
pub mod engine;
pub mod record;
pub mod sources;
