//! Run record persistence

use std::fs;

use chrono::Utc;
use ktlint_cache::adapters::record::FileRecordStore;
use ktlint_cache::adapters::record::codec::{self, FORMAT_VERSION, MAGIC};
use ktlint_cache::core::models::{Digest, RelativePath, RunRecord};
use ktlint_cache::core::ports::RecordStore;

use crate::common::TestProject;

fn sample() -> RunRecord {
    let mut record = RunRecord::new();
    record.insert_fingerprint(RelativePath::new("src/A.kt"), Digest::of(b"class A\n"));
    record.insert_fingerprint(RelativePath::new("src/B.kt"), Digest::of(b"class B\n"));
    record.mark_changed(RelativePath::new("src/B.kt"));
    record
}

#[test]
fn missing_file_loads_as_none() {
    let project = TestProject::new();
    let store = FileRecordStore::new(project.path("build/ktlint/records/root-sha.bin"));
    assert!(store.load().is_none());
}

#[test]
fn save_creates_parent_dirs_and_loads_back() {
    let project = TestProject::new();
    let store = FileRecordStore::new(project.path("build/ktlint/records/root-sha.bin"));
    store.save(&sample()).unwrap();
    assert_eq!(store.load(), Some(sample()));
}

#[test]
fn save_overwrites_previous_record() {
    let project = TestProject::new();
    let store = FileRecordStore::new(project.path("state/root-sha.bin"));
    store.save(&sample()).unwrap();
    store.save(&RunRecord::new()).unwrap();
    assert_eq!(store.load(), Some(RunRecord::new()));
    // No temp files left behind
    assert_eq!(fs::read_dir(project.path("state")).unwrap().count(), 1);
}

#[test]
fn stored_record_carries_write_time() {
    let project = TestProject::new();
    let store = FileRecordStore::new(project.path("root-sha.bin"));
    let before = Utc::now().timestamp();
    store.save(&sample()).unwrap();
    let stored = store.load_stored().unwrap();
    assert!(stored.written_at.timestamp() >= before);
    assert_eq!(stored.record, sample());
}

#[test]
fn garbage_loads_as_none() {
    let project = TestProject::new();
    let path = project.write("root-sha.bin", "this is not a record");
    assert!(FileRecordStore::new(path).load().is_none());
}

#[test]
fn truncated_body_loads_as_none() {
    let project = TestProject::new();
    let bytes = codec::encode(&sample(), Utc::now()).unwrap();
    let path = project.path("root-sha.bin");
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
    assert!(FileRecordStore::new(path).load().is_none());
}

#[test]
fn future_version_loads_as_none() {
    let project = TestProject::new();
    let mut bytes = codec::encode(&sample(), Utc::now()).unwrap();
    assert_eq!(&bytes[..4], &MAGIC);
    bytes[4..6].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
    let path = project.path("root-sha.bin");
    fs::write(&path, &bytes).unwrap();
    assert!(FileRecordStore::new(path).load().is_none());
}

#[test]
fn clear_reports_whether_anything_was_removed() {
    let project = TestProject::new();
    let store = FileRecordStore::new(project.path("root-sha.bin"));
    store.save(&sample()).unwrap();
    assert!(store.clear().unwrap());
    assert!(!store.clear().unwrap());
    assert!(store.load().is_none());
}
