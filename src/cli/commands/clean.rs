//! Clean command - forget recorded state

use std::path::Path;

use ktlint_cache::core::ports::RecordStore;
use ktlint_cache::output::{OperationResult, OutputMode};
use ktlint_cache::project::Project;

/// Delete run records and input history of the selected tasks
pub fn clean(root: &Path, task: Option<&str>, mode: OutputMode) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let mut removed = 0;

    for task in project.tasks().select(task)? {
        if project.record_store(task).clear()? {
            removed += 1;
        }
        if project.history(task).clear()? {
            removed += 1;
        }
        log::debug!("cleared state of task {}", task.name);
    }

    OperationResult {
        success: true,
        message: format!("Removed {removed} state file(s)"),
    }
    .render(mode);

    Ok(())
}
