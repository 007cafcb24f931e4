//! Change-set resolution
//!
//! Digests are supplied through `resolve_with` so no files are needed.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use ktlint_cache::core::models::{Digest, FileChange, RelativePath, RunRecord};
use ktlint_cache::core::services::{ChangeSetResolver, ResolverConfig};
use proptest::prelude::*;

const ROOT: &str = "/repo";

fn resolver() -> ChangeSetResolver {
    ChangeSetResolver::new(ResolverConfig::new(ROOT, ["kt", "kts"]))
}

fn abs(relative: &str) -> PathBuf {
    Path::new(ROOT).join(relative)
}

fn live(files: &[&str]) -> BTreeSet<PathBuf> {
    files.iter().map(|file| abs(file)).collect()
}

/// Digest function over an in-memory "disk"
fn disk(files: &[(&str, &str)]) -> impl Fn(&Path) -> io::Result<Digest> {
    let map: BTreeMap<PathBuf, Digest> =
        files.iter().map(|(file, content)| (abs(file), Digest::of(content.as_bytes()))).collect();
    move |path: &Path| {
        map.get(path)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
    }
}

fn record(entries: &[(&str, &str)], changed: &[&str]) -> RunRecord {
    let mut record = RunRecord::new();
    for (file, content) in entries {
        record.insert_fingerprint(RelativePath::new(file), Digest::of(content.as_bytes()));
    }
    for file in changed {
        record.mark_changed(RelativePath::new(file));
    }
    record
}

fn names(files: &BTreeSet<PathBuf>) -> Vec<String> {
    files
        .iter()
        .map(|file| RelativePath::from_root(Path::new(ROOT), file).unwrap().to_string())
        .collect()
}

#[test]
fn cold_start_is_exactly_the_deltas() {
    let deltas = vec![FileChange::added(abs("A.kt")), FileChange::modified(abs("b/B.kts"))];
    let set = resolver().resolve_with(&deltas, None, &live(&["A.kt", "b/B.kts", "C.kt"]), disk(&[]));
    assert_eq!(names(set.files()), vec!["A.kt", "b/B.kts"]);
    assert!(set.recovered().is_empty());
}

#[test]
fn unrecognized_extensions_are_ignored() {
    let deltas = vec![FileChange::added(abs("README.md")), FileChange::added(abs("A.kt"))];
    let set = resolver().resolve_with(&deltas, None, &live(&["README.md", "A.kt"]), disk(&[]));
    assert_eq!(names(set.files()), vec!["A.kt"]);
}

#[test]
fn stale_changed_path_is_recovered_without_delta() {
    let previous = record(&[("A.kt", "class A\n")], &["A.kt"]);
    let set = resolver().resolve_with(
        &[],
        Some(&previous),
        &live(&["A.kt"]),
        disk(&[("A.kt", "class A { }\n")]),
    );
    assert_eq!(names(set.files()), vec!["A.kt"]);
    assert_eq!(names(set.recovered()), vec!["A.kt"]);
}

#[test]
fn matching_changed_path_is_skipped() {
    let previous = record(&[("A.kt", "class A\n")], &["A.kt"]);
    let set = resolver().resolve_with(&[], Some(&previous), &live(&["A.kt"]), disk(&[("A.kt", "class A\n")]));
    assert!(set.is_empty());
}

#[test]
fn unreadable_changed_path_counts_as_stale() {
    let previous = record(&[("A.kt", "class A\n")], &["A.kt"]);
    let set = resolver().resolve_with(&[], Some(&previous), &live(&["A.kt"]), disk(&[]));
    assert_eq!(names(set.files()), vec!["A.kt"]);
}

#[test]
fn paths_no_longer_live_are_dropped() {
    let previous = record(&[("Gone.kt", "x")], &["Gone.kt"]);
    let deltas = vec![FileChange::added(abs("Gone.kt"))];
    let set = resolver().resolve_with(&deltas, Some(&previous), &live(&[]), disk(&[]));
    assert!(set.is_empty());
}

#[test]
fn removed_deltas_are_excluded() {
    let previous = record(&[("A.kt", "old")], &["A.kt"]);
    let deltas = vec![FileChange::modified(abs("B.kt")), FileChange::removed(abs("A.kt"))];
    let set = resolver().resolve_with(
        &deltas,
        Some(&previous),
        &live(&["A.kt", "B.kt"]),
        disk(&[("A.kt", "new"), ("B.kt", "b")]),
    );
    assert_eq!(names(set.files()), vec!["B.kt"]);
    assert!(set.recovered().is_empty());
}

#[test]
fn delta_paths_are_not_marked_recovered() {
    let previous = record(&[("A.kt", "old")], &["A.kt"]);
    let deltas = vec![FileChange::modified(abs("A.kt"))];
    let set = resolver().resolve_with(&deltas, Some(&previous), &live(&["A.kt"]), disk(&[("A.kt", "new")]));
    assert_eq!(set.len(), 1);
    assert!(set.recovered().is_empty());
}

fn file_names() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set("[a-z]{1,6}(/[a-z]{1,6})?\\.kts?", 0..12)
}

proptest! {
    /// With no previous record the result is exactly the added/modified deltas
    #[test]
    fn cold_start_property(changed in file_names(), unchanged in file_names()) {
        let deltas: Vec<FileChange> = changed.iter().map(|file| FileChange::modified(abs(file))).collect();
        let live: BTreeSet<PathBuf> = changed.iter().chain(&unchanged).map(|file| abs(file)).collect();

        let set = resolver().resolve_with(&deltas, None, &live, disk(&[]));
        let expected: BTreeSet<PathBuf> = changed.iter().map(|file| abs(file)).collect();
        prop_assert_eq!(set.files(), &expected);
    }

    /// Delta order never affects the result
    #[test]
    fn order_independent(changed in file_names(), stale in file_names()) {
        let previous = {
            let mut record = RunRecord::new();
            for file in &stale {
                record.insert_fingerprint(RelativePath::new(file), Digest::of(b"before"));
                record.mark_changed(RelativePath::new(file));
            }
            record
        };
        let live: BTreeSet<PathBuf> = changed.iter().chain(&stale).map(|file| abs(file)).collect();
        let mut deltas: Vec<FileChange> = changed.iter().map(|file| FileChange::added(abs(file))).collect();

        let forward = resolver().resolve_with(&deltas, Some(&previous), &live, disk(&[]));
        deltas.reverse();
        let backward = resolver().resolve_with(&deltas, Some(&previous), &live, disk(&[]));

        prop_assert_eq!(forward.files(), backward.files());
        prop_assert_eq!(forward.len(), changed.union(&stale).count());
    }
}
