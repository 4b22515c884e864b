// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable clarification queue: low-confidence inbox parses that need a
//! human answer before they become a task/note/event, persisted whole as
//! a single JSON array at `.kira/clarifications.json` (small, operator-
//! facing list rather than an append-only log).

use crate::error::VaultError;
use kira_core::clarification::{ClarificationItem, ClarificationStatus};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ClarificationQueue {
    path: PathBuf,
    items: Mutex<Vec<ClarificationItem>>,
}

impl ClarificationQueue {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let items = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&text).map_err(|e| VaultError::Corrupt {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Appends a new pending clarification and persists the whole queue.
    pub fn push(&self, item: ClarificationItem) -> Result<(), VaultError> {
        let mut items = self.items.lock();
        items.push(item);
        write(&self.path, &items)
    }

    pub fn pending(&self) -> Vec<ClarificationItem> {
        self.items
            .lock()
            .iter()
            .filter(|item| item.is_pending())
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<ClarificationItem> {
        self.items
            .lock()
            .iter()
            .find(|item| item.clarification_id == id)
            .cloned()
    }

    /// Marks a clarification resolved or rejected, persisting the change.
    pub fn set_status(&self, id: &str, status: ClarificationStatus) -> Result<(), VaultError> {
        let mut items = self.items.lock();
        let item = items
            .iter_mut()
            .find(|item| item.clarification_id == id)
            .ok_or_else(|| VaultError::NotFound(id.to_string()))?;
        item.status = status;
        write(&self.path, &items)
    }
}

fn write(path: &Path, items: &[ClarificationItem]) -> Result<(), VaultError> {
    let json = serde_json::to_string_pretty(items).map_err(|e| VaultError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "clarification_tests.rs"]
mod tests;
