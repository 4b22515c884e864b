// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only daily audit log (C15): one `audit-YYYY-MM-DD.jsonl` per
//! UTC day under the configured audit directory, one JSON line per
//! recorded command. Grounded on `oj-storage::wal`'s single-fsync-per-write
//! discipline, but unbatched — every [`AuditSink::record`] call must be
//! visible on disk before it returns, not group-committed like a WAL.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use kira_core::audit::AuditSink;
use kira_core::Clock;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct AuditLine<'a> {
    timestamp: String,
    trace_id: &'a str,
    command: &'a str,
    args: &'a serde_json::Value,
    result: &'a serde_json::Value,
}

/// Writes one audit line per [`AuditSink::record`] call to
/// `<dir>/audit-<today>.jsonl`, where "today" is re-evaluated from `clock`
/// on every call so a long-running process rolls over at UTC midnight.
pub struct AuditLogger {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl AuditLogger {
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self { dir: dir.into(), clock }
    }

    fn path_for_today(&self) -> PathBuf {
        let today = self.clock.now().format("%Y-%m-%d");
        self.dir.join(format!("audit-{today}.jsonl"))
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for_today();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{line}")?;
        file.sync_all()
    }
}

impl AuditSink for AuditLogger {
    fn record(&self, trace_id: &str, command: &str, args: &serde_json::Value, result: &serde_json::Value) {
        let line = AuditLine {
            timestamp: self.clock.now().to_rfc3339(),
            trace_id,
            command,
            args,
            result,
        };
        match serde_json::to_string(&line) {
            Ok(text) => {
                if let Err(err) = self.write_line(&text) {
                    tracing::error!(trace_id, command, error = %err, "failed to write audit line");
                }
            }
            Err(err) => {
                tracing::error!(trace_id, command, error = %err, "failed to serialize audit line");
            }
        }
    }
}

/// Every `audit-*.jsonl` line currently on disk under `dir`, in file
/// iteration order. Used by tests and by `kiractl doctor` to sanity-check
/// the audit trail is writable and readable.
pub fn read_all(dir: &Path) -> std::io::Result<Vec<serde_json::Value>> {
    let mut lines = Vec::new();
    if !dir.exists() {
        return Ok(lines);
    }
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        let text = std::fs::read_to_string(&path)?;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(value) = serde_json::from_str(line) {
                lines.push(value);
            }
        }
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
