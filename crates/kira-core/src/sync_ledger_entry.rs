// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conflict/echo bookkeeping for two-way remote sync (C3).

use crate::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side produced the last write recorded for an entity/remote pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOrigin {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLedgerEntry {
    pub entity_id: EntityId,
    pub remote_source: String,
    pub remote_version: String,
    pub remote_etag: Option<String>,
    pub last_write_ts: DateTime<Utc>,
    pub origin: SyncOrigin,
}
