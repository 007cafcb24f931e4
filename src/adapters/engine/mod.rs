//! Builtin lint engine
//!
//! - [`syntax`] - byte classification and brace checking
//! - [`rules`] - the standard rule set
//! - [`BuiltinEngine`] - the [`LintEngine`](crate::core::ports::LintEngine) over those rules

mod builtin;
pub mod rules;
pub mod syntax;

pub use builtin::BuiltinEngine;
