// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync Ledger (C3): echo-break and last-write-wins conflict resolution
//! for two-way remote sync adapters, backed by the same JSONL-materialize
//! pattern as [`crate::dedupe::DedupeStore`].

use crate::error::VaultError;
use kira_core::id::EntityId;
use kira_core::sync_ledger_entry::{SyncLedgerEntry, SyncOrigin};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Which side should win a write conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictWinner {
    Local,
    Remote,
}

pub struct SyncLedger {
    path: PathBuf,
    entries: Mutex<HashMap<(EntityId, String), SyncLedgerEntry>>,
}

impl SyncLedger {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut entries = HashMap::new();
        if path.exists() {
            let file = fs::File::open(&path)?;
            for line in BufReader::new(file).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                if let Ok(entry) = serde_json::from_str::<SyncLedgerEntry>(&line) {
                    entries.insert((entry.entity_id.clone(), entry.remote_source.clone()), entry);
                }
            }
        } else {
            OpenOptions::new().create(true).append(true).open(&path)?;
        }

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn get(&self, entity_id: &EntityId, remote_source: &str) -> Option<SyncLedgerEntry> {
        self.entries
            .lock()
            .get(&(entity_id.clone(), remote_source.to_string()))
            .cloned()
    }

    /// Records a local or remote write for `(entity_id, remote_source)`,
    /// overwriting any prior entry.
    pub fn record(&self, entry: SyncLedgerEntry) -> Result<(), VaultError> {
        let key = (entry.entity_id.clone(), entry.remote_source.clone());
        let mut entries = self.entries.lock();
        entries.insert(key, entry);
        rewrite(&self.path, entries.values())
    }

    /// Echo-break: a remote update should be imported unless its version
    /// matches the last recorded remote version **and** the last write for
    /// this `(entity_id, remote_source)` pair was local.
    pub fn should_import_remote_update(
        &self,
        entity_id: &EntityId,
        remote_source: &str,
        incoming_version: &str,
    ) -> bool {
        match self.get(entity_id, remote_source) {
            Some(entry) => {
                !(entry.remote_version == incoming_version && entry.origin == SyncOrigin::Local)
            }
            None => true,
        }
    }

    /// Last-write-wins on timestamp; ties go to local.
    pub fn resolve_conflict(
        &self,
        local_ts: DateTime<Utc>,
        remote_ts: DateTime<Utc>,
    ) -> ConflictWinner {
        if remote_ts > local_ts {
            ConflictWinner::Remote
        } else {
            ConflictWinner::Local
        }
    }
}

fn rewrite<'a>(
    path: &Path,
    entries: impl Iterator<Item = &'a SyncLedgerEntry>,
) -> Result<(), VaultError> {
    let mut buf = String::new();
    for entry in entries {
        let line = serde_json::to_string(entry).map_err(|e| VaultError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        buf.push_str(&line);
        buf.push('\n');
    }
    let tmp_path = path.with_extension("db.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(buf.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "sync_ledger_tests.rs"]
mod tests;
