// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ExecuteTool` node's per-step mechanics: dry-run short-circuit and
//! retry-with-backoff, split out of `graph.rs` to keep each file focused.

use std::time::Duration;

use indexmap::IndexMap;
use kira_core::entity::{Entity, EntityType, MetaValue};
use kira_core::id::EntityId;
use kira_core::task_status::TaskStatus;
use kira_host::{EntityPatch, HostApi};
use serde_json::{json, Value};
use std::str::FromStr;

use crate::error::AgentError;
use crate::state::{PlanStep, ToolResult};

/// How many attempts [`execute_step`] makes, and what it does once those
/// are exhausted.
#[derive(Debug, Clone, Copy)]
pub struct ExecuteConfig {
    pub max_retries_per_tool: u32,
    pub base_backoff: Duration,
    pub halt_on_error: bool,
}

impl Default for ExecuteConfig {
    fn default() -> Self {
        Self { max_retries_per_tool: 2, base_backoff: Duration::from_millis(50), halt_on_error: false }
    }
}

/// Runs one [`PlanStep`] against the Host API, honoring `dry_run` and
/// retrying transient failures. Returns `Err` only when retries are
/// exhausted *and* `halt_on_error` is set; otherwise a failed step still
/// produces a `status: "error"` [`ToolResult`] so the run can continue.
pub async fn execute_step(
    host: &HostApi,
    step: &PlanStep,
    step_index: usize,
    trace_id: &str,
    config: ExecuteConfig,
) -> Result<ToolResult, AgentError> {
    if step.dry_run {
        return Ok(ToolResult {
            tool: step.tool.clone(),
            step: step_index,
            status: "dry_run".to_string(),
            data: step.args.clone(),
        });
    }

    let mut attempt = 0u32;
    loop {
        match run_tool(host, &step.tool, &step.args, trace_id) {
            Ok(data) => {
                return Ok(ToolResult { tool: step.tool.clone(), step: step_index, status: "ok".to_string(), data })
            }
            Err(err) => {
                attempt += 1;
                if attempt > config.max_retries_per_tool {
                    if config.halt_on_error {
                        return Err(err);
                    }
                    return Ok(ToolResult {
                        tool: step.tool.clone(),
                        step: step_index,
                        status: "error".to_string(),
                        data: json!({"message": err.to_string()}),
                    });
                }
                tokio::time::sleep(config.base_backoff * attempt).await;
            }
        }
    }
}

fn run_tool(host: &HostApi, tool: &str, args: &Value, trace_id: &str) -> Result<Value, AgentError> {
    match tool {
        "task_create" => {
            let metadata = task_metadata_from_args(args);
            let entity = host.create_entity(EntityType::Task, metadata, String::new(), trace_id)?;
            Ok(entity_json(&entity))
        }
        "task_update" => {
            let id = required_str(args, "id")?;
            let metadata = task_metadata_from_args(args);
            let patch = EntityPatch::new().with_metadata(metadata);
            let entity = host.update_entity(&EntityId::new(id), patch, trace_id)?;
            Ok(entity_json(&entity))
        }
        "task_delete" => {
            let id = required_str(args, "id")?;
            host.delete_entity(&EntityId::new(id), trace_id)?;
            Ok(json!({"id": id, "deleted": true}))
        }
        "task_get" => {
            let id = required_str(args, "id")?;
            match host.read_entity(&EntityId::new(id)) {
                Some(entity) => Ok(entity_json(&entity)),
                None => Ok(json!({"id": id, "found": false})),
            }
        }
        "task_list" => {
            let status_filter = args.get("status").and_then(Value::as_str);
            let mut tasks = Vec::new();
            for entity in host.list_entities(Some(EntityType::Task)).flatten() {
                if let Some(filter) = status_filter {
                    let status = entity.metadata.get("status").and_then(MetaValue::as_str).unwrap_or("todo");
                    if status != filter {
                        continue;
                    }
                }
                tasks.push(entity_json(&entity));
            }
            Ok(json!({"count": tasks.len(), "tasks": tasks}))
        }
        "rollup_daily" => {
            let date = args.get("date").and_then(Value::as_str);
            let mut rollups = Vec::new();
            for entity in host.list_entities(Some(EntityType::Rollup)).flatten() {
                if let Some(date) = date {
                    if entity.metadata.get("period_key").and_then(MetaValue::as_str) != Some(date) {
                        continue;
                    }
                }
                rollups.push(entity_json(&entity));
            }
            Ok(json!({"count": rollups.len(), "rollups": rollups}))
        }
        "vault_export" => {
            let destination = required_str(args, "destination")?;
            Ok(json!({
                "destination": destination,
                "status": "staged",
                "note": "export archive is produced by `kiractl backup`",
            }))
        }
        other => Err(AgentError::UnknownTool(other.to_string())),
    }
}

fn required_str<'a>(args: &'a Value, field: &'static str) -> Result<&'a str, AgentError> {
    args.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::Validation(format!("missing required field `{field}`")))
}

fn task_metadata_from_args(args: &Value) -> IndexMap<String, MetaValue> {
    let mut metadata = IndexMap::new();
    if let Some(title) = args.get("title").and_then(Value::as_str) {
        metadata.insert("title".to_string(), MetaValue::Str(title.to_string()));
    }
    if let Some(status) = args.get("status").and_then(Value::as_str) {
        if TaskStatus::from_str(status).is_ok() {
            metadata.insert("status".to_string(), MetaValue::Str(status.to_string()));
        }
    }
    if let Some(tags) = args.get("tags").and_then(Value::as_array) {
        let list = tags
            .iter()
            .filter_map(Value::as_str)
            .map(|s| MetaValue::Str(s.to_string()))
            .collect();
        metadata.insert("tags".to_string(), MetaValue::List(list));
    }
    if let Some(due) = args.get("due").and_then(Value::as_str) {
        metadata.insert("due".to_string(), MetaValue::Str(due.to_string()));
    }
    metadata
}

fn entity_json(entity: &Entity) -> Value {
    json!({
        "id": entity.id.as_str(),
        "type": entity.entity_type.to_string(),
        "status": entity.metadata.get("status").and_then(MetaValue::as_str),
        "title": entity.metadata.get("title").and_then(MetaValue::as_str),
    })
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;
