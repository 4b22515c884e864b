// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kiractl run`: publishes one `message.received` event and lets the
//! inbox subscriber registered at startup turn it into a task, exercising
//! the Telegram→Task path without a concrete chat adapter.

use std::sync::Arc;

use indexmap::IndexMap;
use kira_bus::EventBus;
use kira_core::entity::{EntityType, MetaValue};
use kira_core::event::{Event, EventEnvelope};
use kira_core::{AuditSink, Clock, KiraError};
use kira_host::HostApi;
use kira_vault::DedupeStore;
use serde_json::json;

use super::Invocation;

/// Registers the `message.received` subscriber: checks the dedupe index,
/// and on a genuinely new message creates a `todo` task tagged with the
/// message's source. Runs once per process since the bus holds the
/// handler by `Arc` for as long as the process lives.
pub fn register_inbox_subscriber(
    bus: &EventBus,
    host: Arc<HostApi>,
    dedupe: Arc<DedupeStore>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
) {
    bus.subscribe("message.received", move |envelope: &EventEnvelope| {
        let Event::MessageReceived { text, source, external_id } = &envelope.event else {
            return;
        };

        let mut payload = IndexMap::new();
        payload.insert("text".to_string(), MetaValue::Str(text.clone()));

        if dedupe.is_duplicate(source, external_id, &payload) {
            audit.record(
                &envelope.trace_id,
                "message.duplicate",
                &json!({"source": source, "external_id": external_id}),
                &json!({"skipped": true}),
            );
            return;
        }

        let mut metadata = IndexMap::new();
        metadata.insert("title".to_string(), MetaValue::Str(text.clone()));
        metadata.insert("tags".to_string(), MetaValue::List(vec![MetaValue::Str(source.clone())]));

        let result = host.create_entity(EntityType::Task, metadata, String::new(), &envelope.trace_id);

        match result {
            Ok(entity) => {
                if let Err(err) = dedupe.mark_seen(source, external_id, &payload, clock.as_ref()) {
                    tracing::error!(trace_id = %envelope.trace_id, error = %err, "failed to mark message seen");
                }
                audit.record(
                    &envelope.trace_id,
                    "message.ingested",
                    &json!({"source": source, "external_id": external_id, "text": text}),
                    &json!({"task_id": entity.id.as_str()}),
                );
            }
            Err(err) => {
                tracing::error!(trace_id = %envelope.trace_id, error = %err.to_string(), "failed to create task from message");
                audit.record(
                    &envelope.trace_id,
                    "message.ingest_failed",
                    &json!({"source": source, "external_id": external_id}),
                    &json!({"error": err.to_string()}),
                );
            }
        }
    });
}

pub fn ingest(
    bus: &EventBus,
    inv: Invocation,
    text: &str,
    source: &str,
    external_id: &str,
) -> Result<serde_json::Value, KiraError> {
    let event = Event::MessageReceived {
        text: text.to_string(),
        source: source.to_string(),
        external_id: external_id.to_string(),
    };
    let topic = event.default_topic();
    let envelope = EventEnvelope::new(inv.trace_id, event);
    bus.publish(&topic, &envelope);
    Ok(json!({"published": topic, "source": source, "external_id": external_id}))
}
