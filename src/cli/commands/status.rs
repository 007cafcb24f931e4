//! Status command - show what each task has recorded

use std::path::Path;

use ktlint_cache::fingerprint::fingerprint_all;
use ktlint_cache::output::{OutputMode, StatusReport, TaskStatus};
use ktlint_cache::project::Project;

/// Show the persisted state of the selected tasks
pub fn status(root: &Path, task: Option<&str>, mode: OutputMode) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let mut tasks = Vec::new();

    for task in project.tasks().select(task)? {
        let live = project.live_files(task)?;
        let stored = project.record_store(task).load_stored();
        let current = fingerprint_all(project.root(), &live);
        // Failed runs write the record but leave history uncommitted
        let committed = project
            .history(task)
            .load()
            .is_some_and(|snapshot| current.iter().all(|(path, digest)| snapshot.get(path) == Some(digest)));

        tasks.push(match stored {
            Some(stored) => TaskStatus {
                task: task.name.clone(),
                has_record: true,
                written_at: Some(stored.written_at),
                fingerprints: stored.record.len(),
                changed_paths: stored.record.changed_paths().iter().map(ToString::to_string).collect(),
                live_files: live.len(),
                up_to_date: committed && current.len() == live.len() && stored.record.is_up_to_date(&current),
            },
            None => TaskStatus {
                task: task.name.clone(),
                has_record: false,
                written_at: None,
                fingerprints: 0,
                changed_paths: Vec::new(),
                live_files: live.len(),
                up_to_date: false,
            },
        });
    }

    StatusReport {
        root: project.root().display().to_string(),
        tasks,
    }
    .render(mode);

    Ok(())
}
