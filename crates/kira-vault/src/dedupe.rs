// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotency / dedupe store (C2): an append-only JSONL index of
//! previously seen external events, materialized into memory at open time
//! (the WAL-then-materialize idiom shared with `oj-storage`).
//!
//! The on-disk path keeps the `.db` extension inherited from
//! `original_source`'s sqlite table for compatibility, but the format
//! underneath is plain JSONL.

use crate::error::VaultError;
use kira_core::entity::MetaValue;
use kira_core::seen_event::SeenEvent;
use kira_core::Clock;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct DedupeStore {
    path: PathBuf,
    seen: Mutex<HashMap<String, SeenEvent>>,
}

impl DedupeStore {
    /// Opens the dedupe index at `path`, materializing any existing JSONL
    /// records into memory. Creates the file (and parent directory) if
    /// absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut seen = HashMap::new();
        if path.exists() {
            let file = fs::File::open(&path)?;
            for line in BufReader::new(file).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                if let Ok(record) = serde_json::from_str::<SeenEvent>(&line) {
                    seen.insert(record.event_id.clone(), record);
                }
            }
        } else {
            OpenOptions::new().create(true).append(true).open(&path)?;
        }

        Ok(Self {
            path,
            seen: Mutex::new(seen),
        })
    }

    /// Computes the deterministic event id for `(source, external_id,
    /// payload)` and reports whether it has already been seen.
    pub fn is_duplicate(
        &self,
        source: &str,
        external_id: &str,
        payload: &IndexMap<String, MetaValue>,
    ) -> bool {
        let event_id = kira_core::generate_event_id(source, external_id, payload);
        self.seen.lock().contains_key(&event_id)
    }

    /// Records `(source, external_id, payload)` as seen, appending a JSONL
    /// record. No-op if already present.
    pub fn mark_seen(
        &self,
        source: &str,
        external_id: &str,
        payload: &IndexMap<String, MetaValue>,
        clock: &dyn Clock,
    ) -> Result<(), VaultError> {
        let event_id = kira_core::generate_event_id(source, external_id, payload);
        let mut seen = self.seen.lock();
        if seen.contains_key(&event_id) {
            return Ok(());
        }
        let record = SeenEvent {
            event_id: event_id.clone(),
            first_seen_ts: clock.now(),
            source: source.to_string(),
            external_id: external_id.to_string(),
        };
        append_record(&self.path, &record)?;
        seen.insert(event_id, record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes entries older than `cutoff`. Rewrites the JSONL file in
    /// place; used by Maintenance's TTL purge (C16).
    pub fn purge_older_than(&self, cutoff: chrono::DateTime<chrono::Utc>) -> Result<usize, VaultError> {
        let mut seen = self.seen.lock();
        let before = seen.len();
        seen.retain(|_, record| record.first_seen_ts >= cutoff);
        rewrite(&self.path, seen.values())?;
        Ok(before - seen.len())
    }
}

fn append_record(path: &Path, record: &SeenEvent) -> Result<(), VaultError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(record).map_err(|e| VaultError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    writeln!(file, "{line}")?;
    file.sync_all()?;
    Ok(())
}

fn rewrite<'a>(path: &Path, records: impl Iterator<Item = &'a SeenEvent>) -> Result<(), VaultError> {
    let mut buf = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| VaultError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        buf.push_str(&line);
        buf.push('\n');
    }
    let tmp_path = path.with_extension("db.tmp");
    fs::write(&tmp_path, buf)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "dedupe_tests.rs"]
mod tests;
