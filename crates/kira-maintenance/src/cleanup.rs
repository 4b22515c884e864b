// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TTL-based cleanup (C16): purges old dedupe records, quarantine files,
//! and log files so on-disk state stays bounded. Ported faithfully from
//! `original_source/src/kira/maintenance/cleanup.py` (same three targets,
//! same default TTLs, same `run_cleanup_all` shape); the SQLite
//! `DELETE ... VACUUM` of the original becomes a JSONL
//! rewrite-of-survivors here since [`kira_vault::DedupeStore`] isn't
//! SQL-backed.

use std::path::Path;

use chrono::Duration;
use kira_core::config::CleanupConfig;
use kira_core::Clock;
use kira_vault::DedupeStore;

use crate::error::MaintenanceError;

/// Tallies from one [`cleanup_all`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CleanupStats {
    pub dedupe_removed: usize,
    pub quarantine_removed: usize,
    pub logs_removed: usize,
    pub bytes_freed: u64,
}

/// Purges dedupe records older than `ttl_days`. Returns the count removed.
pub fn cleanup_dedupe(store: &DedupeStore, ttl_days: u32, clock: &dyn Clock) -> Result<usize, MaintenanceError> {
    let cutoff = clock.now() - Duration::days(ttl_days as i64);
    store.purge_older_than(cutoff).map_err(MaintenanceError::from)
}

/// Deletes files under `quarantine_dir` whose modification time is older
/// than `ttl_days`. Returns `(files_removed, bytes_freed)`.
pub fn cleanup_quarantine(quarantine_dir: &Path, ttl_days: u32, clock: &dyn Clock) -> Result<(usize, u64), MaintenanceError> {
    purge_old_files(quarantine_dir, ttl_days, clock, |_path| true)
}

/// Deletes `*.log*` files under `log_dir` whose modification time is older
/// than `ttl_days`. Returns `(files_removed, bytes_freed)`.
pub fn cleanup_logs(log_dir: &Path, ttl_days: u32, clock: &dyn Clock) -> Result<(usize, u64), MaintenanceError> {
    purge_old_files(log_dir, ttl_days, clock, |path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.contains(".log"))
            .unwrap_or(false)
    })
}

fn purge_old_files(
    dir: &Path,
    ttl_days: u32,
    clock: &dyn Clock,
    matches: impl Fn(&Path) -> bool,
) -> Result<(usize, u64), MaintenanceError> {
    if !dir.exists() {
        return Ok((0, 0));
    }
    let cutoff = clock.now() - Duration::days(ttl_days as i64);
    let mut removed = 0;
    let mut bytes_freed = 0u64;

    for path in walk_files(dir)? {
        if !matches(&path) {
            continue;
        }
        let metadata = std::fs::metadata(&path)?;
        let modified: chrono::DateTime<chrono::Utc> = metadata.modified()?.into();
        if modified < cutoff {
            bytes_freed += metadata.len();
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok((removed, bytes_freed))
}

fn walk_files(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            files.extend(walk_files(&path)?);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

/// Runs all three cleanup targets against the standard vault artifact
/// layout: `<vault>/artifacts/{dedupe.db,quarantine/,logs/}`.
pub fn cleanup_all(
    vault_root: &Path,
    dedupe_store: &DedupeStore,
    config: &CleanupConfig,
    clock: &dyn Clock,
) -> Result<CleanupStats, MaintenanceError> {
    let mut stats = CleanupStats::default();

    stats.dedupe_removed = cleanup_dedupe(dedupe_store, config.dedupe_ttl_days, clock)?;

    let (files, bytes) = cleanup_quarantine(&vault_root.join("artifacts").join("quarantine"), config.quarantine_ttl_days, clock)?;
    stats.quarantine_removed = files;
    stats.bytes_freed += bytes;

    let (files, bytes) = cleanup_logs(&vault_root.join("artifacts").join("logs"), config.log_ttl_days, clock)?;
    stats.logs_removed = files;
    stats.bytes_freed += bytes;

    Ok(stats)
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
