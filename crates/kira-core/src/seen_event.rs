// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable record of a previously processed external event (C2, idempotency).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeenEvent {
    pub event_id: String,
    pub first_seen_ts: DateTime<Utc>,
    pub source: String,
    pub external_id: String,
}
