//! Lint and format commands

use std::path::Path;

use ktlint_cache::adapters::delta::ExplicitDeltas;
use ktlint_cache::core::models::Mode;
use ktlint_cache::output::{OutputMode, RunSummary};
use ktlint_cache::project::Project;
use ktlint_cache::runner::{Deltas, TaskRunner};

use crate::cli::app::RunArgs;

/// Lint or format the selected tasks
pub fn run(root: &Path, args: &RunArgs, mode: Mode, output: OutputMode) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let tasks = project.tasks().select(args.task.as_deref())?;
    let runner = TaskRunner::new(&project, project.dispatcher(args.in_process)?, deltas(args)?);

    let summary = RunSummary::new(mode, runner.run_all(&tasks, mode)?);
    summary.render(output);

    if !summary.passed {
        std::process::exit(1);
    }

    Ok(())
}

fn deltas(args: &RunArgs) -> anyhow::Result<Deltas> {
    if args.rerun {
        return Ok(Deltas::Rerun);
    }
    if args.changed.is_empty() && args.removed.is_empty() && args.deltas.is_none() {
        return Ok(Deltas::History);
    }

    // Relative paths on the command line are relative to where we were started
    let base = std::env::current_dir()?;
    let mut explicit = ExplicitDeltas::new(&base, &args.changed, &args.removed);
    if let Some(file) = &args.deltas {
        explicit.extend(ExplicitDeltas::from_json(&base, file)?);
    }
    Ok(Deltas::Explicit(explicit))
}
