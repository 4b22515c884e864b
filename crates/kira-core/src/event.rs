// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The canonical event vocabulary published on the Event Bus (C6).
//!
//! A bus topic (the canonical event *name*, e.g. `"task.created"`) is a
//! plain `String` chosen by the publisher; [`Event`] is the typed payload
//! carried alongside it. Host API mutations publish both the
//! entity-type-specific topic (`task.created`, `note.created`, ...) and
//! the generic `entity.created`/`entity.updated`/`entity.deleted` topic so
//! that type-agnostic subscribers (the audit trail, rollup aggregation)
//! don't need to know every entity type in advance.

use crate::entity::{Entity, EntityType};
use crate::id::EntityId;
use crate::task_status::TaskStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    MessageReceived {
        text: String,
        source: String,
        external_id: String,
    },
    FileDropped {
        path: String,
    },
    EntityCreated {
        entity: Entity,
    },
    EntityUpdated {
        entity: Entity,
    },
    EntityDeleted {
        id: EntityId,
        entity_type: EntityType,
    },
    TaskEnterState {
        id: EntityId,
        state: TaskStatus,
    },
    SyncTick {
        adapter: String,
    },
    RollupRequested {
        id: EntityId,
        period: String,
    },
    RollupCompleted {
        id: EntityId,
    },
    CalendarTimebox {
        action: TimeboxAction,
        id: EntityId,
    },
    /// A custom event a plugin publishes through its [`PluginContext`]'s
    /// Event Bus handle (`kira-plugin::host::functions`'s `bus_publish`
    /// op) — the typed counterpart of the manifest's declared
    /// `contributes.events`, which have no built-in [`Event`] shape.
    PluginEvent {
        topic: String,
        payload: serde_json::Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeboxAction {
    Create,
    Close,
    Pause,
    MarkReview,
}

impl Event {
    /// The default topic this event publishes under when no more specific
    /// name is supplied by the caller (entity mutations are published
    /// under both their type-specific and generic topics explicitly by the
    /// Host API, so this is mostly useful for the bus-only event kinds).
    pub fn default_topic(&self) -> String {
        match self {
            Event::MessageReceived { .. } => "message.received".to_string(),
            Event::FileDropped { .. } => "file.dropped".to_string(),
            Event::EntityCreated { entity } => format!("{}.created", entity.entity_type),
            Event::EntityUpdated { entity } => format!("{}.updated", entity.entity_type),
            Event::EntityDeleted { entity_type, .. } => format!("{entity_type}.deleted"),
            Event::TaskEnterState { state, .. } => format!("task.enter_{state}"),
            Event::SyncTick { .. } => "sync.tick".to_string(),
            Event::RollupRequested { .. } => "rollup.requested".to_string(),
            Event::RollupCompleted { .. } => "rollup.completed".to_string(),
            Event::CalendarTimebox { action, .. } => {
                let verb = match action {
                    TimeboxAction::Create => "create",
                    TimeboxAction::Close => "close",
                    TimeboxAction::Pause => "pause",
                    TimeboxAction::MarkReview => "mark_review",
                };
                format!("calendar.{verb}_timebox")
            }
            Event::PluginEvent { topic, .. } => topic.clone(),
        }
    }
}

/// Envelope carried through the bus: a topic-addressed [`Event`] plus the
/// trace id that correlates it with every other event/log line from the
/// same logical operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub trace_id: String,
    pub event: Event,
}

impl EventEnvelope {
    pub fn new(trace_id: impl Into<String>, event: Event) -> Self {
        Self {
            trace_id: trace_id.into(),
            event,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
