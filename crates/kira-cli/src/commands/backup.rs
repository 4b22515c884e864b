// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kiractl backup {create,restore,list,cleanup}`: thin wrappers over the
//! vault backup/restore maintenance (C16), applying the `backup.*` config
//! table's directory and retention settings.

use std::path::Path;

use kira_core::{Clock, KiraError};
use kira_maintenance::{cleanup_old_backups, create_backup, list_backups, restore_backup, BackupInfo};
use serde_json::json;

pub fn create(vault_path: &Path, backup_dir: &Path, compress: bool, clock: &dyn Clock) -> Result<serde_json::Value, KiraError> {
    let info = create_backup(vault_path, backup_dir, compress, clock.now())?;
    Ok(json!({
        "backup_path": info.backup_path,
        "timestamp": info.timestamp,
        "size_bytes": info.size_bytes,
    }))
}

pub fn restore(backup_path: &Path, restore_path: &Path, overwrite: bool) -> Result<serde_json::Value, KiraError> {
    let restored_to = restore_backup(backup_path, restore_path, overwrite)?;
    Ok(json!({"restored_to": restored_to}))
}

pub fn list(backup_dir: &Path) -> Result<serde_json::Value, KiraError> {
    let backups: Vec<BackupInfo> = list_backups(backup_dir)?;
    Ok(json!({"backups": backups}))
}

pub fn cleanup(backup_dir: &Path, retention_count: u32) -> Result<serde_json::Value, KiraError> {
    let removed = cleanup_old_backups(backup_dir, retention_count)?;
    Ok(json!({"removed": removed}))
}
