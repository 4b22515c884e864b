// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The one host function extism guests call: `kira_host_call`. Every
//! vault/bus/kv/secrets/log operation a plugin performs goes through this
//! single request/response JSON envelope, deliberately simplified from
//! `querymt-querymt`'s multi-function `extism:host/user` namespace (no
//! streaming, no per-operation host function) since Kira plugins do one
//! blocking round trip at a time.

use std::str::FromStr;
use std::sync::Arc;

use extism::{CurrentPlugin, UserData, Val};
use indexmap::IndexMap;
use kira_core::entity::{EntityType, MetaValue};
use kira_core::id::EntityId;
use serde_json::{json, Value};

use crate::context::PluginContext;

fn metadata_from_json(value: &Value) -> IndexMap<String, MetaValue> {
    let mut metadata = IndexMap::new();
    if let Some(obj) = value.as_object() {
        for (key, val) in obj {
            let meta_value = match val {
                Value::String(s) => MetaValue::Str(s.clone()),
                Value::Bool(b) => MetaValue::Bool(*b),
                Value::Number(n) => n
                    .as_i64()
                    .map(MetaValue::Int)
                    .unwrap_or_else(|| MetaValue::Str(n.to_string())),
                Value::Array(items) => MetaValue::List(
                    items
                        .iter()
                        .filter_map(|v| v.as_str())
                        .map(|s| MetaValue::Str(s.to_string()))
                        .collect(),
                ),
                Value::Null => MetaValue::Null,
                Value::Object(_) => MetaValue::Str(val.to_string()),
            };
            metadata.insert(key.clone(), meta_value);
        }
    }
    metadata
}

fn dispatch(ctx: &PluginContext, request: &Value) -> Result<Value, String> {
    let op = request.get("op").and_then(Value::as_str).ok_or("missing `op`")?;

    match op {
        "vault_create_entity" => {
            let entity_type_str = request.get("entity_type").and_then(Value::as_str).ok_or("missing `entity_type`")?;
            let entity_type =
                EntityType::from_str(entity_type_str).map_err(|_| format!("unknown entity_type `{entity_type_str}`"))?;
            let metadata = metadata_from_json(request.get("metadata").unwrap_or(&Value::Null));
            let content = request.get("content").and_then(Value::as_str).unwrap_or_default().to_string();
            let trace_id = request.get("trace_id").and_then(Value::as_str).unwrap_or("plugin");
            let entity = ctx
                .vault
                .create_entity(entity_type, metadata, content, trace_id)
                .map_err(|e| e.to_string())?;
            Ok(serde_json::to_value(entity).map_err(|e| e.to_string())?)
        }
        "vault_read_entity" => {
            let id = request.get("id").and_then(Value::as_str).ok_or("missing `id`")?;
            match ctx.vault.read_entity(&EntityId::new(id)) {
                Some(entity) => Ok(serde_json::to_value(entity).map_err(|e| e.to_string())?),
                None => Ok(json!(null)),
            }
        }
        "bus_publish" => {
            let topic = request.get("topic").and_then(Value::as_str).ok_or("missing `topic`")?;
            let trace_id = request.get("trace_id").and_then(Value::as_str).unwrap_or("plugin");
            let payload = request.get("payload").cloned().unwrap_or(Value::Null);
            let envelope = kira_core::event::EventEnvelope::new(
                trace_id,
                kira_core::event::Event::PluginEvent { topic: topic.to_string(), payload },
            );
            ctx.bus.publish(topic, &envelope);
            Ok(json!({"published": true}))
        }
        "kv_get" => {
            let key = request.get("key").and_then(Value::as_str).ok_or("missing `key`")?;
            Ok(json!(ctx.kv.get(key)))
        }
        "kv_set" => {
            let key = request.get("key").and_then(Value::as_str).ok_or("missing `key`")?;
            let value = request.get("value").and_then(Value::as_str).ok_or("missing `value`")?;
            ctx.kv.set(key, value);
            Ok(json!({"set": true}))
        }
        "secrets_get" => {
            let key = request.get("key").and_then(Value::as_str).ok_or("missing `key`")?;
            Ok(json!(ctx.secrets.get(key)))
        }
        "log_info" => {
            let message = request.get("message").and_then(Value::as_str).unwrap_or_default();
            ctx.log_info(message);
            Ok(json!({"logged": true}))
        }
        other => Err(format!("unknown op `{other}`")),
    }
}

/// The `extism:host/user::kira_host_call` implementation: decodes the
/// guest's request from plugin memory, dispatches it against the shared
/// [`PluginContext`], and writes the JSON response back into a new memory
/// block, matching the `memory_get_val`/`memory_new` handle-passing
/// convention used throughout `querymt-querymt`'s host functions.
pub(crate) fn kira_host_call(
    plugin: &mut CurrentPlugin,
    inputs: &[Val],
    outputs: &mut [Val],
    user_data: UserData<Arc<PluginContext>>,
) -> Result<(), extism::Error> {
    let request_bytes: Vec<u8> = plugin.memory_get_val(&inputs[0])?;
    let request: Value = serde_json::from_slice(&request_bytes)
        .map_err(|e| extism::Error::msg(format!("malformed host-call request: {e}")))?;

    let ctx = user_data.get()?;
    let ctx = ctx.lock().map_err(|_| extism::Error::msg("plugin context lock poisoned"))?;

    let response = match dispatch(&ctx, &request) {
        Ok(data) => json!({"ok": true, "data": data}),
        Err(message) => json!({"ok": false, "error": message}),
    };

    let response_bytes = serde_json::to_vec(&response)
        .map_err(|e| extism::Error::msg(format!("failed to encode host-call response: {e}")))?;
    let handle = plugin.memory_new(&response_bytes)?;
    outputs[0] = Val::I64(handle.offset as i64);
    Ok(())
}

#[cfg(test)]
#[path = "functions_tests.rs"]
mod tests;
