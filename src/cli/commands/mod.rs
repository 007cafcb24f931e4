//! Command implementations

mod clean;
mod init;
mod run;
mod status;
mod worker;

pub use clean::clean;
pub use init::init;
pub use run::run;
pub use status::status;
pub use worker::worker;
