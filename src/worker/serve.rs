//! Worker side of the process protocol

use std::io::{Read, Write};
use std::sync::Arc;

use anyhow::Context;

use super::dispatcher::run_batch;
use super::protocol::{PROTOCOL_VERSION, WorkRequest, WorkResponse};
use crate::core::ports::LintEngine;

/// Read one request from `input`, process it, write one response to `output`
pub fn serve(engine: Arc<dyn LintEngine>, mut input: impl Read, mut output: impl Write) -> anyhow::Result<()> {
    let mut raw = String::new();
    input.read_to_string(&mut raw).context("cannot read work request")?;
    let request: WorkRequest = serde_json::from_str(&raw).context("malformed work request")?;

    if request.version != PROTOCOL_VERSION {
        anyhow::bail!(
            "unsupported protocol version {} (worker speaks {PROTOCOL_VERSION})",
            request.version
        );
    }

    let name = engine.name().to_string();
    let outcome = run_batch(
        engine,
        &request.files,
        request.editor_config.as_deref(),
        request.auto_correct,
        request.threads,
    )?;

    let response = WorkResponse {
        version: PROTOCOL_VERSION,
        engine: name,
        outcome,
    };
    serde_json::to_writer(&mut output, &response)?;
    output.flush()?;
    Ok(())
}
