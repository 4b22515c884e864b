// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Vault backup and restore (C16): a single tar (optionally gzip'd)
//! archive of the whole vault directory, named with the UTC creation
//! instant. Ported from `original_source/src/kira/maintenance/backup.py`
//! (naming, arcname, restore-refuses-overwrite, rename-on-restore,
//! timestamp-parse-from-filename, retention-count cleanup); `tar` +
//! `flate2` (gzip) stand in for Python's stdlib `tarfile`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::MaintenanceError;

/// Metadata about one backup archive.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BackupInfo {
    pub backup_path: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Creates `<backup_dir>/vault-backup-<utc>.tar[.gz]` from `vault_path`.
/// `now` is the UTC instant stamped into the filename (normally
/// `clock.now()`, passed explicitly so callers control the name
/// deterministically in tests).
pub fn create_backup(
    vault_path: &Path,
    backup_dir: &Path,
    compress: bool,
    now: DateTime<Utc>,
) -> Result<BackupInfo, MaintenanceError> {
    std::fs::create_dir_all(backup_dir)?;

    let timestamp_str = now.format("%Y%m%d-%H%M%S");
    let filename = if compress {
        format!("vault-backup-{timestamp_str}.tar.gz")
    } else {
        format!("vault-backup-{timestamp_str}.tar")
    };
    let backup_path = backup_dir.join(filename);

    let arcname = vault_path
        .file_name()
        .ok_or_else(|| MaintenanceError::MalformedArchive(format!("vault path has no name: {}", vault_path.display())))?;

    let file = std::fs::File::create(&backup_path)?;
    if compress {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.append_dir_all(arcname, vault_path)?;
        builder.into_inner()?.finish()?;
    } else {
        let mut builder = tar::Builder::new(file);
        builder.append_dir_all(arcname, vault_path)?;
        builder.into_inner()?;
    }

    let size_bytes = std::fs::metadata(&backup_path)?.len();
    Ok(BackupInfo { backup_path, timestamp: now, size_bytes })
}

fn open_archive(backup_path: &Path) -> std::io::Result<tar::Archive<Box<dyn std::io::Read>>> {
    let file = std::fs::File::open(backup_path)?;
    let is_gzip = backup_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "gz")
        .unwrap_or(false);
    let reader: Box<dyn std::io::Read> =
        if is_gzip { Box::new(GzDecoder::new(file)) } else { Box::new(file) };
    Ok(tar::Archive::new(reader))
}

/// Extracts `backup_path` into `restore_path`, refusing to overwrite an
/// existing path unless `overwrite` is set. The archive's single top-level
/// directory is extracted alongside `restore_path`'s parent, then renamed
/// to `restore_path` if the names differ.
pub fn restore_backup(backup_path: &Path, restore_path: &Path, overwrite: bool) -> Result<PathBuf, MaintenanceError> {
    if restore_path.exists() {
        if !overwrite {
            return Err(MaintenanceError::RestorePathExists(restore_path.display().to_string()));
        }
        if restore_path.is_dir() {
            std::fs::remove_dir_all(restore_path)?;
        } else {
            std::fs::remove_file(restore_path)?;
        }
    }

    let parent = restore_path
        .parent()
        .ok_or_else(|| MaintenanceError::MalformedArchive("restore path has no parent".to_string()))?;
    std::fs::create_dir_all(parent)?;

    let root_name = {
        let mut peek = open_archive(backup_path)?;
        let mut entries = peek.entries()?;
        let first = entries
            .next()
            .transpose()?
            .ok_or_else(|| MaintenanceError::MalformedArchive("archive is empty".to_string()))?;
        let path = first.path()?.into_owned();
        let component = path
            .components()
            .next()
            .ok_or_else(|| MaintenanceError::MalformedArchive("archive entry has an empty path".to_string()))?;
        component.as_os_str().to_owned()
    };

    let mut archive = open_archive(backup_path)?;
    archive.unpack(parent)?;
    let extracted_path = parent.join(&root_name);
    if extracted_path != restore_path {
        std::fs::rename(&extracted_path, restore_path)?;
    }

    Ok(restore_path.to_path_buf())
}

/// Parses `vault-backup-YYYYMMDD-HHMMSS.tar[.gz]` into its UTC timestamp.
fn parse_timestamp(filename: &str) -> Option<DateTime<Utc>> {
    let stem = filename.strip_suffix(".tar.gz").or_else(|| filename.strip_suffix(".tar"))?;
    let ts = stem.strip_prefix("vault-backup-")?;
    let naive = chrono::NaiveDateTime::parse_from_str(ts, "%Y%m%d-%H%M%S").ok()?;
    Some(naive.and_utc())
}

/// Every backup under `backup_dir`, newest first. Files whose name doesn't
/// match the `vault-backup-*` convention are silently skipped.
pub fn list_backups(backup_dir: &Path) -> std::io::Result<Vec<BackupInfo>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }
    let mut backups = Vec::new();
    for entry in std::fs::read_dir(backup_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        let Some(timestamp) = parse_timestamp(name) else { continue };
        let size_bytes = entry.metadata()?.len();
        backups.push(BackupInfo { backup_path: path, timestamp, size_bytes });
    }
    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(backups)
}

/// Deletes every backup beyond the newest `retention_count`. Returns the
/// number deleted.
pub fn cleanup_old_backups(backup_dir: &Path, retention_count: u32) -> std::io::Result<usize> {
    let backups = list_backups(backup_dir)?;
    let to_delete = backups.into_iter().skip(retention_count as usize);
    let mut deleted = 0;
    for backup in to_delete {
        std::fs::remove_file(&backup.backup_path)?;
        deleted += 1;
    }
    Ok(deleted)
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
