// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Direct task CRUD, routed through the same Policy Enforcer (C12) the
//! Agent Graph uses — a CLI-issued `task delete` is as much a tool
//! invocation as an agent-issued one, so it is checked the same way
//! (Open Question resolution, recorded in DESIGN.md).

use indexmap::IndexMap;
use kira_agent::policy::tool_policy;
use kira_agent::PolicyManager;
use kira_core::entity::{EntityType, MetaValue};
use kira_core::id::EntityId;
use kira_core::{AuditSink, KiraError};
use kira_host::{EntityPatch, HostApi};
use serde_json::json;

use super::Invocation;

fn check_policy(policy: &PolicyManager, tool: &str, confirmed: bool) -> Result<(), KiraError> {
    let Some(tp) = tool_policy(tool) else {
        return Err(KiraError::Validation(format!("no policy mapping for tool `{tool}`")));
    };
    policy
        .check(tool, &tp.required_capabilities, tp.destructive, confirmed)
        .map_err(|violation| KiraError::PolicyViolation(violation.to_string()))
}

pub fn create(
    host: &HostApi,
    policy: &PolicyManager,
    audit: &dyn AuditSink,
    inv: Invocation,
    title: &str,
    tags: &[String],
    content: Option<&str>,
) -> Result<serde_json::Value, KiraError> {
    check_policy(policy, "task_create", inv.confirmed)?;

    let mut metadata = IndexMap::new();
    metadata.insert("title".to_string(), MetaValue::Str(title.to_string()));
    if !tags.is_empty() {
        metadata.insert(
            "tags".to_string(),
            MetaValue::List(tags.iter().map(|t| MetaValue::Str(t.clone())).collect()),
        );
    }

    let args = json!({"title": title, "tags": tags});
    if inv.dry_run {
        let result = json!({"dry_run": true, "would_create": args});
        audit.record(inv.trace_id, "task.create", &args, &result);
        return Ok(result);
    }

    let entity = host.create_entity(EntityType::Task, metadata, content.unwrap_or_default().to_string(), inv.trace_id)?;
    let result = json!({"task_id": entity.id.as_str(), "status": "todo"});
    audit.record(inv.trace_id, "task.create", &args, &result);
    Ok(result)
}

pub fn update(
    host: &HostApi,
    policy: &PolicyManager,
    audit: &dyn AuditSink,
    inv: Invocation,
    id: &str,
    status: Option<&str>,
    title: Option<&str>,
) -> Result<serde_json::Value, KiraError> {
    check_policy(policy, "task_update", inv.confirmed)?;

    let mut patch = EntityPatch::new();
    if let Some(status) = status {
        patch.metadata.insert("status".to_string(), MetaValue::Str(status.to_string()));
    }
    if let Some(title) = title {
        patch.metadata.insert("title".to_string(), MetaValue::Str(title.to_string()));
    }

    let args = json!({"id": id, "status": status, "title": title});
    if inv.dry_run {
        let result = json!({"dry_run": true, "would_update": args});
        audit.record(inv.trace_id, "task.update", &args, &result);
        return Ok(result);
    }

    let entity = host.update_entity(&EntityId::new(id), patch, inv.trace_id)?;
    let result = json!({"task_id": entity.id.as_str(), "updated_ts": entity.updated_ts});
    audit.record(inv.trace_id, "task.update", &args, &result);
    Ok(result)
}

pub fn delete(
    host: &HostApi,
    policy: &PolicyManager,
    audit: &dyn AuditSink,
    inv: Invocation,
    id: &str,
) -> Result<serde_json::Value, KiraError> {
    check_policy(policy, "task_delete", inv.confirmed)?;

    let args = json!({"id": id});
    if inv.dry_run {
        let result = json!({"dry_run": true, "would_delete": id});
        audit.record(inv.trace_id, "task.delete", &args, &result);
        return Ok(result);
    }

    host.delete_entity(&EntityId::new(id), inv.trace_id)?;
    let result = json!({"task_id": id});
    audit.record(inv.trace_id, "task.delete", &args, &result);
    Ok(result)
}

pub fn get(host: &HostApi, policy: &PolicyManager, inv: Invocation, id: &str) -> Result<serde_json::Value, KiraError> {
    check_policy(policy, "task_get", inv.confirmed)?;
    match host.read_entity(&EntityId::new(id)) {
        Some(entity) => Ok(serde_json::to_value(&entity).unwrap_or(serde_json::Value::Null)),
        None => Err(KiraError::NotFound(id.to_string())),
    }
}

pub fn list(host: &HostApi, policy: &PolicyManager, inv: Invocation) -> Result<serde_json::Value, KiraError> {
    check_policy(policy, "task_list", inv.confirmed)?;
    let tasks: Vec<serde_json::Value> = host
        .vault()
        .list(Some(EntityType::Task))
        .filter_map(Result::ok)
        .map(|entity| serde_json::to_value(&entity).unwrap_or(serde_json::Value::Null))
        .collect();
    Ok(json!({"tasks": tasks}))
}
