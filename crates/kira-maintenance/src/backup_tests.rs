// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use std::fs;

fn sample_vault() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let vault = dir.path().join("source").join("vault");
    fs::create_dir_all(vault.join("tasks")).unwrap();
    fs::write(vault.join("tasks").join("t1.md"), "---\ntitle: Buy milk\n---\n").unwrap();
    dir
}

#[test]
fn create_backup_produces_a_gzip_archive_named_with_the_timestamp() {
    let dir = sample_vault();
    let vault = dir.path().join("source").join("vault");
    let backup_dir = dir.path().join("backups");
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();

    let info = create_backup(&vault, &backup_dir, true, now).unwrap();
    assert_eq!(info.backup_path.file_name().unwrap(), "vault-backup-20260301-123000.tar.gz");
    assert!(info.size_bytes > 0);
}

#[test]
fn restore_backup_round_trips_the_vault_contents() {
    let dir = sample_vault();
    let vault = dir.path().join("source").join("vault");
    let backup_dir = dir.path().join("backups");
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
    let info = create_backup(&vault, &backup_dir, true, now).unwrap();

    let restore_path = dir.path().join("out").join("restored");
    restore_backup(&info.backup_path, &restore_path, false).unwrap();

    let restored_file = restore_path.join("tasks").join("t1.md");
    assert!(restored_file.exists());
    assert_eq!(fs::read_to_string(restored_file).unwrap(), "---\ntitle: Buy milk\n---\n");
}

#[test]
fn restore_backup_refuses_to_overwrite_without_the_flag() {
    let dir = sample_vault();
    let vault = dir.path().join("source").join("vault");
    let backup_dir = dir.path().join("backups");
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
    let info = create_backup(&vault, &backup_dir, true, now).unwrap();

    let restore_path = dir.path().join("out").join("restored");
    fs::create_dir_all(&restore_path).unwrap();

    let err = restore_backup(&info.backup_path, &restore_path, false).unwrap_err();
    assert!(matches!(err, MaintenanceError::RestorePathExists(_)));
}

#[test]
fn restore_backup_overwrites_when_requested() {
    let dir = sample_vault();
    let vault = dir.path().join("source").join("vault");
    let backup_dir = dir.path().join("backups");
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
    let info = create_backup(&vault, &backup_dir, true, now).unwrap();

    let restore_path = dir.path().join("out").join("restored");
    fs::create_dir_all(&restore_path).unwrap();
    fs::write(restore_path.join("stale.txt"), "old").unwrap();

    restore_backup(&info.backup_path, &restore_path, true).unwrap();
    assert!(!restore_path.join("stale.txt").exists());
    assert!(restore_path.join("tasks").join("t1.md").exists());
}

#[test]
fn list_backups_sorts_newest_first_and_skips_unrelated_files() {
    let dir = tempfile::tempdir().unwrap();
    let backup_dir = dir.path();
    fs::write(backup_dir.join("vault-backup-20260101-000000.tar.gz"), b"a").unwrap();
    fs::write(backup_dir.join("vault-backup-20260301-000000.tar.gz"), b"b").unwrap();
    fs::write(backup_dir.join("README.md"), b"not a backup").unwrap();

    let backups = list_backups(backup_dir).unwrap();
    assert_eq!(backups.len(), 2);
    assert!(backups[0].timestamp > backups[1].timestamp);
}

#[test]
fn cleanup_old_backups_keeps_only_the_newest_n() {
    let dir = tempfile::tempdir().unwrap();
    let backup_dir = dir.path();
    for (day, _) in [(1, ()), (2, ()), (3, ())] {
        fs::write(backup_dir.join(format!("vault-backup-202601{day:02}-000000.tar.gz")), b"x").unwrap();
    }

    let deleted = cleanup_old_backups(backup_dir, 1).unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(list_backups(backup_dir).unwrap().len(), 1);
}
