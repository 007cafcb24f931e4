//! Report rendering and pass/fail

use std::path::PathBuf;

use ktlint_cache::core::models::{BatchOutcome, DiagnosticResult, FileFailure, Mode};
use ktlint_cache::core::services::{
    ReportOptions, ReportStyle, error_count, passed, report, strip_ansi, wrap_detail,
};

fn result(fixed: bool, file: &str, line: i32, col: i32, rule: &str, detail: &str) -> DiagnosticResult {
    DiagnosticResult {
        fixed,
        file: PathBuf::from(file),
        line,
        col,
        rule_id: rule.to_string(),
        detail: detail.to_string(),
    }
}

fn outcome(results: Vec<DiagnosticResult>) -> BatchOutcome {
    BatchOutcome {
        results,
        failures: Vec::new(),
    }
}

#[test]
fn compact_groups_by_file_and_sorts_by_position() {
    let outcome = outcome(vec![
        result(false, "/p/B.kt", 1, 1, "standard:final-newline", "File must end with a newline (\\n)"),
        result(false, "/p/A.kt", 10, 2, "standard:no-trailing-spaces", "Trailing space(s)"),
        result(true, "/p/A.kt", 1, 15, "standard:no-empty-class-body", "Unnecessary block (\"{}\")"),
    ]);
    let rendered = report(&outcome, Mode::Format, &ReportOptions::new("/p"));

    assert_eq!(
        rendered.text,
        "file:///p/A.kt:1:15 ✅ standard:no-empty-class-body Unnecessary block (\"{}\")\n\
         file:///p/A.kt:10:2 ❌ standard:no-trailing-spaces Trailing space(s)\n\
         \n\
         file:///p/B.kt:1:1 ❌ standard:final-newline File must end with a newline (\\n)\n"
    );
    assert!(!rendered.passed);
}

#[test]
fn same_position_ties_break_on_rule_then_detail() {
    let outcome = outcome(vec![
        result(false, "/p/A.kt", 1, 1, "b-rule", "x"),
        result(false, "/p/A.kt", 1, 1, "a-rule", "z"),
        result(false, "/p/A.kt", 1, 1, "a-rule", "y"),
    ]);
    let text = report(&outcome, Mode::Lint, &ReportOptions::new("/p")).text;
    let order: Vec<&str> = text.lines().map(|line| line.split_once(" ❌ ").unwrap().1).collect();
    assert_eq!(order, vec!["a-rule y", "a-rule z", "b-rule x"]);
}

#[test]
fn table_layout_aligns_and_wraps() {
    let outcome = outcome(vec![
        result(true, "/p/src/A.kt", 2, 3, "rule-long", "a longer detail text"),
        result(false, "/p/src/A.kt", 1, 1, "rule-a", "short"),
    ]);
    let options = ReportOptions::new("/p")
        .with_style(ReportStyle::Table)
        .with_max_detail_width(10);
    let text = report(&outcome, Mode::Format, &options).text;

    // RULE ID column is 9 + 2 wide, DETAIL column 8 + 2
    let expected = [
        "   file: src/A.kt".to_string(),
        format!("{}RULE ID    DETAIL    FILE", " ".repeat(9)),
        format!("{}✘  rule-a     short     file:///p/src/A.kt:1:1:", " ".repeat(6)),
        format!("{}✔  rule-long  a longer  file:///p/src/A.kt:2:3:", " ".repeat(6)),
        format!("{}detail", " ".repeat(20)),
        format!("{}text", " ".repeat(20)),
    ]
    .join("\n")
        + "\n";
    assert_eq!(text, expected);
}

#[test]
fn table_header_uses_minimum_widths() {
    let outcome = outcome(vec![result(false, "/p/A.kt", 1, 1, "r", "d")]);
    let options = ReportOptions::new("/p").with_style(ReportStyle::Table);
    let text = report(&outcome, Mode::Lint, &options).text;
    let header = text.lines().nth(1).unwrap();
    assert_eq!(header, format!("{}RULE ID  DETAIL  FILE", " ".repeat(9)));
}

#[test]
fn colored_output_strips_to_plain_output() {
    let outcome = outcome(vec![
        result(false, "/p/src/A.kt", 1, 1, "rule-a", "short"),
        result(true, "/p/src/B.kt", 1, 1, "rule-b", "fixed one"),
    ]);
    for style in [ReportStyle::Compact, ReportStyle::Table] {
        let plain = ReportOptions::new("/p").with_style(style);
        let colored = plain.clone().with_color(true);
        colored::control::set_override(true);
        let painted = report(&outcome, Mode::Lint, &colored).text;
        colored::control::unset_override();
        assert_eq!(strip_ansi(&painted), report(&outcome, Mode::Lint, &plain).text);
    }
}

#[test]
fn failures_are_listed_after_diagnostics() {
    let outcome = BatchOutcome {
        results: vec![result(false, "/p/A.kt", 1, 1, "r", "d")],
        failures: vec![FileFailure::new("/p/B.kt", "parse error at 1:9: Missing '}'")],
    };
    let text = report(&outcome, Mode::Lint, &ReportOptions::new("/p")).text;
    assert!(text.ends_with("Files that could not be processed:\n  /p/B.kt: parse error at 1:9: Missing '}'\n"));
    assert!(text.starts_with("file:///p/A.kt:1:1"));
}

#[test]
fn format_passes_when_everything_was_fixed() {
    let fixed = outcome(vec![result(true, "/p/A.kt", 1, 1, "r", "d")]);
    assert!(passed(&fixed, Mode::Format));
    assert!(!passed(&fixed, Mode::Lint));
    assert_eq!(error_count(&fixed, Mode::Format), 0);
    assert_eq!(error_count(&fixed, Mode::Lint), 1);
}

#[test]
fn any_failure_fails_the_run() {
    let outcome = BatchOutcome {
        results: Vec::new(),
        failures: vec![FileFailure::new("/p/A.kt", "cannot read")],
    };
    assert!(!passed(&outcome, Mode::Format));
    assert_eq!(error_count(&outcome, Mode::Format), 1);
}

#[test]
fn empty_outcome_passes_silently() {
    let rendered = report(&BatchOutcome::default(), Mode::Lint, &ReportOptions::new("/p"));
    assert!(rendered.passed);
    assert!(rendered.text.is_empty());
}

#[test]
fn wrap_is_greedy() {
    assert_eq!(
        wrap_detail("Exceeded max line length (120) in a long file", 20),
        vec!["Exceeded max line", "length (120) in a", "long file"]
    );
}
