//! Project configuration loading

use ktlint_cache::config::{ColorChoice, ConfigError, IsolationMode, ProjectConfig};
use ktlint_cache::core::services::ReportStyle;
use ktlint_cache::project::Project;

use crate::common::TestProject;

#[test]
fn missing_file_means_defaults() {
    let test = TestProject::new();
    assert_eq!(ProjectConfig::load(test.root()).unwrap(), ProjectConfig::default());
}

#[test]
fn full_file_is_parsed() {
    let test = TestProject::new();
    test.write(
        ".ktlint.toml",
        r#"
state_dir = ".state"

[source]
extensions = ["kt"]
exclude = ["generated/**"]

[features]
kotlin_source_sets = true

[[source_set]]
name = "jvmMain"
dirs = ["src/jvmMain/kotlin"]

[editorconfig]
path = "config/.editorconfig"

[worker]
isolation = "in-process"
threads = 4
env = ["JAVA_HOME"]

[report]
style = "table"
max_detail_width = 40
color = "never"
"#,
    );

    let config = ProjectConfig::load(test.root()).unwrap();
    assert_eq!(config.state_dir.to_str(), Some(".state"));
    assert_eq!(config.source.extensions, vec!["kt"]);
    assert_eq!(config.worker.isolation, IsolationMode::InProcess);
    assert_eq!(config.worker.threads, Some(4));
    assert_eq!(config.report.style, ReportStyle::Table);
    assert_eq!(config.report.max_detail_width, 40);
    assert_eq!(config.report.color, ColorChoice::Never);

    let sets = config.effective_source_sets();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].name, "jvmMain");

    let project = Project::with_config(test.root().to_path_buf(), config).unwrap();
    assert_eq!(project.editor_config(), Some(test.path("config/.editorconfig")));
    assert_eq!(project.layout().record_file("jvmMain"), test.path(".state/records/jvmMain-sha.bin"));
}

#[test]
fn malformed_file_is_an_error() {
    let test = TestProject::new();
    test.write(".ktlint.toml", "[worker]\nisolation = \"container\"\n");
    assert!(matches!(ProjectConfig::load(test.root()), Err(ConfigError::Parse { .. })));
}

#[test]
fn bad_exclude_glob_is_an_error() {
    let test = TestProject::new();
    test.write(".ktlint.toml", "[source]\nexclude = [\"[\"]\n");
    assert!(matches!(ProjectConfig::load(test.root()), Err(ConfigError::InvalidGlob { .. })));
}

#[test]
fn duplicate_source_sets_are_rejected() {
    let test = TestProject::new();
    test.write(
        ".ktlint.toml",
        "[features]\nkotlin_source_sets = true\n\n\
         [[source_set]]\nname = \"main\"\ndirs = [\"a\"]\n\n\
         [[source_set]]\nname = \"main\"\ndirs = [\"b\"]\n",
    );
    assert!(Project::open(test.root()).is_err());
}

#[test]
fn excluded_dirs_are_not_sources() {
    let test = TestProject::new();
    test.write(".ktlint.toml", "[source]\nexclude = [\"generated/**\"]\n");
    test.write("generated/G.kt", "class G\n");
    test.write("src/A.kt", "class A\n");

    let project = test.project();
    let root = project.tasks().get("root").unwrap();
    let live = project.live_files(root).unwrap();
    assert_eq!(live.into_iter().collect::<Vec<_>>(), vec![test.path("src/A.kt")]);
}
