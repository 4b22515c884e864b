// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The entity data model: everything the Vault Store persists is an
//! [`Entity`] tagged with an [`EntityType`] and a metadata map of
//! [`MetaValue`]s.

use crate::id::EntityId;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// A typed metadata value. Maps preserve insertion order so front-matter
/// round-trips byte-stable.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<MetaValue>),
    Map(IndexMap<String, MetaValue>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }
}

/// The kind of thing an [`Entity`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Task,
    Note,
    Event,
    Rollup,
    InboxItem,
}

impl EntityType {
    /// Directory name under the vault root this type is stored in.
    pub fn dir_name(&self) -> &'static str {
        match self {
            EntityType::Task => "tasks",
            EntityType::Note => "notes",
            EntityType::Event => "events",
            EntityType::Rollup => "rollups",
            EntityType::InboxItem => "inbox_items",
        }
    }

    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Task,
            EntityType::Note,
            EntityType::Event,
            EntityType::Rollup,
            EntityType::InboxItem,
        ]
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityType::Task => "task",
            EntityType::Note => "note",
            EntityType::Event => "event",
            EntityType::Rollup => "rollup",
            EntityType::InboxItem => "inbox_item",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(EntityType::Task),
            "note" => Ok(EntityType::Note),
            "event" => Ok(EntityType::Event),
            "rollup" => Ok(EntityType::Rollup),
            "inbox_item" => Ok(EntityType::InboxItem),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// A single persisted unit of vault content: a task, note, calendar event,
/// rollup, or inbox item.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub metadata: IndexMap<String, MetaValue>,
    pub content: String,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
    pub done_ts: Option<DateTime<Utc>>,
}

impl Entity {
    pub fn new(id: EntityId, entity_type: EntityType, now: DateTime<Utc>) -> Self {
        Self {
            id,
            entity_type,
            metadata: IndexMap::new(),
            content: String::new(),
            created_ts: now,
            updated_ts: now,
            done_ts: None,
        }
    }

    /// Deep-merges `patch` into `self.metadata`.
    ///
    /// A patch value of [`MetaValue::Null`] deletes the corresponding key
    /// (see DESIGN.md's patch-semantics decision).
    /// Nested maps are merged recursively; lists are replaced wholesale.
    pub fn apply_patch(&mut self, patch: IndexMap<String, MetaValue>) {
        Self::merge_map(&mut self.metadata, patch);
    }

    fn merge_map(target: &mut IndexMap<String, MetaValue>, patch: IndexMap<String, MetaValue>) {
        for (key, value) in patch {
            match value {
                MetaValue::Null => {
                    target.shift_remove(&key);
                }
                MetaValue::Map(patch_child) => match target.get_mut(&key) {
                    Some(MetaValue::Map(existing)) => {
                        Self::merge_map(existing, patch_child);
                    }
                    _ => {
                        target.insert(key, MetaValue::Map(patch_child));
                    }
                },
                other => {
                    target.insert(key, other);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
