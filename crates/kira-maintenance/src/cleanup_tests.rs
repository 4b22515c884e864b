// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kira_core::clock::FakeClock;
use kira_core::entity::MetaValue;
use indexmap::IndexMap;
use std::fs;
use std::time::{Duration as StdDuration, SystemTime};

#[test]
fn cleanup_dedupe_removes_only_entries_past_the_ttl() {
    let dir = tempfile::tempdir().unwrap();
    let store = DedupeStore::open(dir.path().join("dedupe.db")).unwrap();
    let clock = FakeClock::default();

    let mut payload = IndexMap::new();
    payload.insert("text".to_string(), MetaValue::Str("old".to_string()));
    store.mark_seen("telegram", "old-1", &payload, &clock).unwrap();

    clock.advance(Duration::days(40));
    let mut payload = IndexMap::new();
    payload.insert("text".to_string(), MetaValue::Str("new".to_string()));
    store.mark_seen("telegram", "new-1", &payload, &clock).unwrap();

    let removed = cleanup_dedupe(&store, 30, &clock).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.len(), 1);
}

fn touch_with_age(path: &std::path::Path, days_old: i64) {
    fs::write(path, b"data").unwrap();
    let past = SystemTime::now() - StdDuration::from_secs((days_old * 86_400) as u64);
    let file = fs::File::open(path).unwrap();
    file.set_modified(past).unwrap();
}

#[test]
fn cleanup_quarantine_deletes_only_files_older_than_ttl() {
    let dir = tempfile::tempdir().unwrap();
    let quarantine = dir.path().join("artifacts").join("quarantine");
    fs::create_dir_all(&quarantine).unwrap();
    touch_with_age(&quarantine.join("old.txt"), 100);
    touch_with_age(&quarantine.join("recent.txt"), 1);

    let clock = FakeClock::default();
    let (removed, bytes_freed) = cleanup_quarantine(&quarantine, 90, &clock).unwrap();
    assert_eq!(removed, 1);
    assert!(bytes_freed > 0);
    assert!(!quarantine.join("old.txt").exists());
    assert!(quarantine.join("recent.txt").exists());
}

#[test]
fn cleanup_logs_only_matches_dot_log_files() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("artifacts").join("logs");
    fs::create_dir_all(&logs).unwrap();
    touch_with_age(&logs.join("kira.log"), 10);
    touch_with_age(&logs.join("kira.log.1"), 10);
    touch_with_age(&logs.join("notes.md"), 10);

    let clock = FakeClock::default();
    let (removed, _) = cleanup_logs(&logs, 7, &clock).unwrap();
    assert_eq!(removed, 2);
    assert!(logs.join("notes.md").exists());
}

#[test]
fn cleanup_targets_a_missing_directory_without_erroring() {
    let dir = tempfile::tempdir().unwrap();
    let clock = FakeClock::default();
    let (removed, bytes) = cleanup_quarantine(&dir.path().join("no-such-dir"), 90, &clock).unwrap();
    assert_eq!((removed, bytes), (0, 0));
}

#[test]
fn cleanup_all_aggregates_every_target() {
    let dir = tempfile::tempdir().unwrap();
    let vault_root = dir.path();
    let artifacts = vault_root.join("artifacts");
    fs::create_dir_all(artifacts.join("quarantine")).unwrap();
    fs::create_dir_all(artifacts.join("logs")).unwrap();
    touch_with_age(&artifacts.join("quarantine").join("old.bin"), 200);
    touch_with_age(&artifacts.join("logs").join("kira.log"), 30);

    let store = DedupeStore::open(artifacts.join("dedupe.db")).unwrap();
    let clock = FakeClock::default();
    let config = kira_core::config::CleanupConfig::default();

    let stats = cleanup_all(vault_root, &store, &config, &clock).unwrap();
    assert_eq!(stats.dedupe_removed, 0);
    assert_eq!(stats.quarantine_removed, 1);
    assert_eq!(stats.logs_removed, 1);
    assert!(stats.bytes_freed > 0);
}
