// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clarification queue item: a low-confidence inbox parse waiting for a
//! human decision before it becomes a durable entity.

use crate::entity::{EntityType, MetaValue};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarificationStatus {
    Pending,
    Resolved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationItem {
    pub clarification_id: String,
    pub source_event_id: String,
    pub extracted_type: EntityType,
    pub extracted_data: IndexMap<String, MetaValue>,
    pub confidence: f64,
    pub created_ts: DateTime<Utc>,
    pub status: ClarificationStatus,
    pub suggested_alternatives: Vec<String>,
}

impl ClarificationItem {
    pub fn is_pending(&self) -> bool {
        self.status == ClarificationStatus::Pending
    }
}

#[cfg(test)]
#[path = "clarification_tests.rs"]
mod tests;
