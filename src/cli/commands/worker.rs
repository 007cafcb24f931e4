//! Worker command - serve one batch for process isolation

use std::io;
use std::sync::Arc;

use ktlint_cache::adapters::engine::BuiltinEngine;
use ktlint_cache::worker::serve;

/// Read a request from stdin, answer on stdout
pub fn worker() -> anyhow::Result<()> {
    let engine = Arc::new(BuiltinEngine::new());
    log::debug!("worker {} serving on stdin", ktlint_cache::VERSION);
    serve(engine, io::stdin().lock(), io::stdout().lock())
}
