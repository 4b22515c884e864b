// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Host API (C5): the sole privileged gateway to the vault. Every
//! mutation goes through one of the four operations below; plugins and
//! the agent graph never touch [`kira_vault::VaultStore`] directly.
//!
//! Validation and the task FSM guard run to completion *before* any
//! filesystem mutation, mirroring
//! `oj-storage::state::MaterializedState::apply_event`'s guard-before-mutate
//! discipline — adapted here from "apply an already-durable event" to
//! "guard, then persist, then emit".

use crate::error::HostError;
use indexmap::IndexMap;
use kira_bus::EventBus;
use kira_core::entity::{Entity, EntityType, MetaValue};
use kira_core::event::{Event, EventEnvelope};
use kira_core::id::EntityId;
use kira_core::task_status::TaskStatus;
use kira_core::Clock;
use kira_vault::VaultStore;
use std::str::FromStr;
use std::sync::Arc;

/// A partial update to an [`Entity`]. `metadata` is deep-merged per
/// [`Entity::apply_patch`]; `content`, when present, replaces the body
/// wholesale. A plugin needs some way to rewrite the free-form body too,
/// so `content` sits alongside the metadata patch rather than inside it
/// (recorded in DESIGN.md).
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    pub metadata: IndexMap<String, MetaValue>,
    pub content: Option<String>,
}

impl EntityPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: IndexMap<String, MetaValue>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Required metadata keys per entity type. Missing or empty-string values
/// fail validation before any write.
fn required_fields(entity_type: EntityType) -> &'static [&'static str] {
    match entity_type {
        EntityType::Task => &["title"],
        EntityType::Note => &["title"],
        EntityType::Event => &["title"],
        EntityType::Rollup => &["period"],
        EntityType::InboxItem => &["source"],
    }
}

fn validate_required_fields(
    entity_type: EntityType,
    metadata: &IndexMap<String, MetaValue>,
) -> Result<(), HostError> {
    for field in required_fields(entity_type) {
        match metadata.get(*field) {
            Some(MetaValue::Str(s)) if !s.trim().is_empty() => {}
            Some(MetaValue::Null) | None => {
                return Err(HostError::Validation(format!(
                    "{entity_type} requires non-empty metadata field `{field}`"
                )))
            }
            Some(MetaValue::Str(_)) => {
                return Err(HostError::Validation(format!(
                    "{entity_type} metadata field `{field}` must not be blank"
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn current_task_status(entity: &Entity) -> TaskStatus {
    entity
        .metadata
        .get("status")
        .and_then(MetaValue::as_str)
        .and_then(|s| TaskStatus::from_str(s).ok())
        .unwrap_or(TaskStatus::Todo)
}

/// The Host API (C5): typed entity CRUD with validation, the task FSM
/// guard, and Event Bus emission. Wraps a [`VaultStore`] and an
/// [`EventBus`] plus the injected [`Clock`] used for every `created_ts`/
/// `updated_ts` stamp.
pub struct HostApi {
    vault: Arc<VaultStore>,
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
}

impl HostApi {
    pub fn new(vault: Arc<VaultStore>, bus: Arc<EventBus>, clock: Arc<dyn Clock>) -> Self {
        Self { vault, bus, clock }
    }

    pub fn vault(&self) -> &Arc<VaultStore> {
        &self.vault
    }

    /// Creates a new entity. Allocates an id from `metadata`'s `title` (or
    /// `source` for inbox items) if the caller didn't already decide one,
    /// stamps `created_ts == updated_ts == now`, validates required
    /// fields, persists, then publishes `<type>.created` and
    /// `entity.created`.
    pub fn create_entity(
        &self,
        entity_type: EntityType,
        metadata: IndexMap<String, MetaValue>,
        content: String,
        trace_id: &str,
    ) -> Result<Entity, HostError> {
        validate_required_fields(entity_type, &metadata)?;

        let now = self.clock.now();
        let slug_source = metadata
            .get("title")
            .or_else(|| metadata.get("source"))
            .and_then(MetaValue::as_str)
            .unwrap_or("untitled");
        let vault = self.vault.clone();
        let id = EntityId::generate(entity_type, now, slug_source, |candidate| {
            vault.get(&EntityId::new(candidate)).is_ok()
        });

        let mut entity = Entity::new(id, entity_type, now);
        entity.metadata = metadata;
        entity.content = content;
        if entity_type == EntityType::Task {
            let status = current_task_status(&entity);
            if status == TaskStatus::Done {
                entity.done_ts = Some(now);
            }
        }

        self.vault.upsert(&entity)?;

        let event = Event::EntityCreated { entity: entity.clone() };
        self.publish(trace_id, event);

        Ok(entity)
    }

    /// Returns `None` (not an error) on a missing id.
    pub fn read_entity(&self, id: &EntityId) -> Option<Entity> {
        self.vault.get(id).ok()
    }

    /// Deep-merges `patch` over the stored entity's metadata (and
    /// optionally replaces its content), re-validates the task FSM if
    /// `status` changed, stamps `updated_ts`, sets/clears `done_ts`, then
    /// publishes `<type>.updated`, `entity.updated`, and any
    /// `task.enter_<state>` this transition triggers.
    ///
    /// Validation and the FSM guard run before the vault write: a
    /// rejected transition never touches disk.
    pub fn update_entity(
        &self,
        id: &EntityId,
        patch: EntityPatch,
        trace_id: &str,
    ) -> Result<Entity, HostError> {
        let mut entity = self
            .vault
            .get(id)
            .map_err(|_| HostError::NotFound(id.to_string()))?;

        let is_task = entity.entity_type == EntityType::Task;
        let mut transitioned_to: Option<TaskStatus> = None;

        if is_task {
            if let Some(target_str) = patch.metadata.get("status").and_then(MetaValue::as_str) {
                let target = TaskStatus::from_str(target_str)
                    .map_err(|_| HostError::Validation(format!("unknown task status `{target_str}`")))?;
                let current = current_task_status(&entity);
                if current != target && !current.can_transition_to(target) {
                    return Err(HostError::FsmGuard {
                        from: current.to_string(),
                        to: target.to_string(),
                    });
                }
                if current != target {
                    transitioned_to = Some(target);
                }
            }
        }

        entity.apply_patch(patch.metadata);
        if let Some(content) = patch.content {
            entity.content = content;
        }

        let now = self.clock.now();
        entity.updated_ts = now;
        if let Some(target) = transitioned_to {
            entity.done_ts = if target == TaskStatus::Done { Some(now) } else { None };
        }

        self.vault.upsert(&entity)?;

        self.publish(trace_id, Event::EntityUpdated { entity: entity.clone() });
        if let Some(target) = transitioned_to {
            self.publish(
                trace_id,
                Event::TaskEnterState {
                    id: entity.id.clone(),
                    state: target,
                },
            );
        }

        Ok(entity)
    }

    /// Idempotent: deleting an absent id is not an error. Publishes
    /// `<type>.deleted`/`entity.deleted` only when something was actually
    /// on disk.
    pub fn delete_entity(&self, id: &EntityId, trace_id: &str) -> Result<(), HostError> {
        let existing_type = self.vault.get(id).ok().map(|e| e.entity_type);
        self.vault.delete(id)?;

        if let Some(entity_type) = existing_type {
            self.publish(
                trace_id,
                Event::EntityDeleted {
                    id: id.clone(),
                    entity_type,
                },
            );
        }
        Ok(())
    }

    /// Lazily lists entities of `entity_type`, or every type if `None`.
    pub fn list_entities(
        &self,
        entity_type: Option<EntityType>,
    ) -> impl Iterator<Item = Result<Entity, HostError>> + '_ {
        self.vault.list(entity_type).map(|r| r.map_err(HostError::from))
    }

    /// Publishes both the type-specific topic (`task.created`, ...) and
    /// the generic `entity.created`/`entity.updated`/`entity.deleted`
    /// topic, so type-agnostic subscribers (the audit trail, rollup
    /// aggregation) don't need to know every entity type in advance.
    fn publish(&self, trace_id: &str, event: Event) {
        let specific_topic = event.default_topic();
        let envelope = EventEnvelope::new(trace_id, event.clone());
        self.bus.publish(&specific_topic, &envelope);

        let generic_topic = match &event {
            Event::EntityCreated { .. } => Some("entity.created"),
            Event::EntityUpdated { .. } => Some("entity.updated"),
            Event::EntityDeleted { .. } => Some("entity.deleted"),
            _ => None,
        };
        if let Some(topic) = generic_topic {
            if topic != specific_topic {
                self.bus.publish(topic, &envelope);
            }
        }
    }
}

impl kira_core::ports::EntityWriter for HostApi {
    /// The Rollup pipeline (C8) calls through this trait rather than the
    /// inherent method to avoid a `kira-bus` → `kira-host` dependency
    /// cycle (`kira-host` depends on `kira-bus` for the Event Bus). The
    /// caller is required to have already embedded a `trace_id` metadata
    /// field; we thread it through to the same event emission the
    /// inherent `create_entity` performs.
    fn create_entity(
        &self,
        entity_type: EntityType,
        metadata: IndexMap<String, MetaValue>,
        content: String,
    ) -> Result<Entity, kira_core::KiraError> {
        let trace_id = metadata
            .get("trace_id")
            .and_then(MetaValue::as_str)
            .unwrap_or("unknown")
            .to_string();
        HostApi::create_entity(self, entity_type, metadata, content, &trace_id).map_err(Into::into)
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
