//! End-to-end task runs, in process

use std::fs;
use std::path::PathBuf;

use ktlint_cache::adapters::delta::ExplicitDeltas;
use ktlint_cache::core::models::{Mode, RelativePath};
use ktlint_cache::core::ports::RecordStore;
use ktlint_cache::project::Project;
use ktlint_cache::runner::{Deltas, TaskOutcome, TaskRunner};
use ktlint_cache::task::{ROOT_TASK, SCRIPTS_TASK};

use crate::common::TestProject;

fn run(project: &Project, task: &str, mode: Mode, deltas: Deltas) -> TaskOutcome {
    let runner = TaskRunner::new(project, project.dispatcher(true).unwrap(), deltas);
    runner.run(project.tasks().get(task).unwrap(), mode).unwrap()
}

fn processed(outcome: &TaskOutcome, root: &TestProject) -> Vec<String> {
    outcome
        .processed
        .iter()
        .map(|file| RelativePath::from_root(root.root(), file).unwrap().to_string())
        .collect()
}

fn sources() -> TestProject {
    let test = TestProject::new();
    test.write("src/A.kt", "class A { }\n");
    test.write("src/B.kt", "class B\n");
    test.write("src/c/C.kt", "val c = 1  \n");
    test.write("build.gradle.kts", "plugins { }\n");
    test
}

fn record_bytes(project: &Project, task: &str) -> Vec<u8> {
    fs::read(project.layout().record_file(task)).unwrap()
}

#[test]
fn format_then_lint_processes_nothing() {
    let test = sources();
    let project = test.project();

    let format = run(&project, ROOT_TASK, Mode::Format, Deltas::History);
    assert!(format.passed);
    assert_eq!(processed(&format, &test), vec!["src/A.kt", "src/B.kt", "src/c/C.kt"]);
    assert_eq!(test.read("src/A.kt"), "class A\n");
    let before = record_bytes(&project, ROOT_TASK);

    let lint = run(&project, ROOT_TASK, Mode::Lint, Deltas::History);
    assert!(lint.passed);
    assert!(lint.processed.is_empty());
    assert!(!lint.record_written);
    assert_eq!(record_bytes(&project, ROOT_TASK), before);
}

#[test]
fn format_records_changed_paths() {
    let test = sources();
    let project = test.project();
    run(&project, ROOT_TASK, Mode::Format, Deltas::History);

    let record = project.record_store(project.tasks().get(ROOT_TASK).unwrap()).load().unwrap();
    let changed: Vec<_> = record.changed_paths().iter().map(ToString::to_string).collect();
    assert_eq!(changed, vec!["src/A.kt", "src/c/C.kt"]);
    assert_eq!(record.len(), 3);
}

#[test]
fn deleted_record_reprocesses_everything() {
    let test = sources();
    let project = test.project();
    run(&project, ROOT_TASK, Mode::Format, Deltas::History);

    fs::remove_file(project.layout().record_file(ROOT_TASK)).unwrap();

    let lint = run(&project, ROOT_TASK, Mode::Lint, Deltas::History);
    assert_eq!(processed(&lint, &test), vec!["src/A.kt", "src/B.kt", "src/c/C.kt"]);
    assert!(lint.passed);
    assert!(project.layout().record_file(ROOT_TASK).is_file());
}

#[test]
fn corrupt_record_reprocesses_everything() {
    let test = sources();
    let project = test.project();
    run(&project, ROOT_TASK, Mode::Format, Deltas::History);

    fs::write(project.layout().record_file(ROOT_TASK), b"KTRR garbage").unwrap();

    let lint = run(&project, ROOT_TASK, Mode::Lint, Deltas::History);
    assert_eq!(lint.processed.len(), 3);
}

#[test]
fn stale_changed_file_is_recovered_without_deltas() {
    let test = sources();
    let project = test.project();
    run(&project, ROOT_TASK, Mode::Format, Deltas::History);

    // Undo the format behind the build's back
    test.write("src/A.kt", "class A { }\n");

    let no_deltas = Deltas::Explicit(ExplicitDeltas::new(test.root(), &[], &[]));
    let lint = run(&project, ROOT_TASK, Mode::Lint, no_deltas);
    assert_eq!(processed(&lint, &test), vec!["src/A.kt"]);
    assert_eq!(lint.recovered, vec![test.path("src/A.kt")]);
    assert!(!lint.passed);
}

#[test]
fn history_picks_up_edits() {
    let test = sources();
    let project = test.project();
    run(&project, ROOT_TASK, Mode::Format, Deltas::History);

    test.write("src/B.kt", "class B {\n    fun b() = 1\n}\n");
    test.write("src/D.kt", "class D\n");

    let lint = run(&project, ROOT_TASK, Mode::Lint, Deltas::History);
    assert_eq!(processed(&lint, &test), vec!["src/B.kt", "src/D.kt"]);
    assert!(lint.passed);
}

#[test]
fn removed_files_leave_the_record() {
    let test = sources();
    let project = test.project();
    run(&project, ROOT_TASK, Mode::Format, Deltas::History);

    test.remove("src/B.kt");
    test.write("src/c/C.kt", "val c = 2\n");

    run(&project, ROOT_TASK, Mode::Format, Deltas::History);
    let record = project.record_store(project.tasks().get(ROOT_TASK).unwrap()).load().unwrap();
    assert!(record.fingerprint(&RelativePath::new("src/B.kt")).is_none());
    assert!(record.fingerprint(&RelativePath::new("src/c/C.kt")).is_some());
}

#[test]
fn failed_lint_is_retried() {
    let test = TestProject::new();
    test.write("src/A.kt", "import foo.*\n");
    let project = test.project();

    let first = run(&project, ROOT_TASK, Mode::Lint, Deltas::History);
    assert!(!first.passed);
    assert_eq!(first.errors, 1);
    assert_eq!(
        first.failure_message().unwrap(),
        "Ktlint lint finished with 1 errors which were not fixed. Check log for details."
    );

    let second = run(&project, ROOT_TASK, Mode::Lint, Deltas::History);
    assert_eq!(processed(&second, &test), vec!["src/A.kt"]);
}

#[test]
fn engine_failure_is_isolated_and_not_recorded() {
    let test = TestProject::new();
    test.write("src/A.kt", "class A { }\n");
    test.write("src/Broken.kt", "class Broken {\n");
    let project = test.project();

    let format = run(&project, ROOT_TASK, Mode::Format, Deltas::History);
    assert!(!format.passed);
    assert_eq!(format.outcome.failures.len(), 1);
    assert_eq!(format.outcome.results.len(), 1);
    assert_eq!(test.read("src/A.kt"), "class A\n");

    let record = project.record_store(project.tasks().get(ROOT_TASK).unwrap()).load().unwrap();
    assert!(record.fingerprint(&RelativePath::new("src/A.kt")).is_some());
    assert!(record.fingerprint(&RelativePath::new("src/Broken.kt")).is_none());
}

#[test]
fn rerun_processes_everything() {
    let test = sources();
    let project = test.project();
    run(&project, ROOT_TASK, Mode::Format, Deltas::History);

    let rerun = run(&project, ROOT_TASK, Mode::Lint, Deltas::Rerun);
    assert_eq!(rerun.processed.len(), 3);
    assert!(rerun.passed);
}

#[test]
fn explicit_deltas_limit_the_run() {
    let test = sources();
    let project = test.project();

    let changed = vec![PathBuf::from("src/B.kt"), PathBuf::from("README.md")];
    let deltas = Deltas::Explicit(ExplicitDeltas::new(test.root(), &changed, &[]));
    let lint = run(&project, ROOT_TASK, Mode::Lint, deltas);
    assert_eq!(processed(&lint, &test), vec!["src/B.kt"]);
}

#[test]
fn scripts_task_owns_build_scripts() {
    let test = sources();
    let project = test.project();

    let format = run(&project, SCRIPTS_TASK, Mode::Format, Deltas::History);
    assert_eq!(processed(&format, &test), vec!["build.gradle.kts"]);
    assert_eq!(test.read("build.gradle.kts"), "plugins { }\n");
    assert!(project.layout().record_file(SCRIPTS_TASK).is_file());
    assert!(!project.layout().record_file(ROOT_TASK).exists());
}

#[test]
fn source_sets_split_the_project() {
    let test = TestProject::new();
    test.write(".ktlint.toml", "[features]\nkotlin_source_sets = true\n");
    test.write("src/main/kotlin/A.kt", "class A\n");
    test.write("src/test/kotlin/ATest.kt", "class ATest\n");
    test.write("tools/Other.kt", "class Other\n");
    let project = test.project();

    let runner = TaskRunner::new(&project, project.dispatcher(true).unwrap(), Deltas::History);
    let tasks = project.tasks().select(None).unwrap();
    let outcomes = runner.run_all(&tasks, Mode::Lint).unwrap();

    let names: Vec<_> = outcomes.iter().map(|o| o.task.as_str()).collect();
    assert_eq!(names, vec!["scripts", "main", "test"]);
    assert_eq!(processed(&outcomes[1], &test), vec!["src/main/kotlin/A.kt"]);
    assert_eq!(processed(&outcomes[2], &test), vec!["src/test/kotlin/ATest.kt"]);
}

#[test]
fn dot_slash_source_set_dirs_own_their_files() {
    let test = TestProject::new();
    test.write(
        ".ktlint.toml",
        "[features]\nkotlin_source_sets = true\n\n[[source_set]]\nname = \"main\"\ndirs = [\"./src/main\"]\n",
    );
    test.write("src/main/A.kt", "class A { }\n");
    let project = test.project();

    let lint = run(&project, "main", Mode::Lint, Deltas::History);
    assert_eq!(lint.live_files, 1);
    assert_eq!(processed(&lint, &test), vec!["src/main/A.kt"]);
    assert!(!lint.passed);
}

#[test]
fn source_sets_with_colliding_state_files_are_rejected() {
    let test = TestProject::new();
    test.write(
        ".ktlint.toml",
        "[features]\nkotlin_source_sets = true\n\n\
         [[source_set]]\nname = \"my.set\"\ndirs = [\"a\"]\n\n\
         [[source_set]]\nname = \"my_set\"\ndirs = [\"b\"]\n",
    );
    let err = Project::open(test.root()).unwrap_err();
    assert!(err.to_string().contains("my_set"), "{err:#}");
}
