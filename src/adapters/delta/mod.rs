//! Delta sources
//!
//! - [`InputHistory`] - snapshot diff, the default
//! - [`ExplicitDeltas`] - deltas handed in by an outer build
//! - [`Rerun`] - everything, regardless of history

mod explicit;
mod history;

pub use explicit::ExplicitDeltas;
pub use history::{InputHistory, Rerun};
