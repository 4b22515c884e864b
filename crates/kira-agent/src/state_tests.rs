// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn budget_defaults_match_reference_values() {
    let budget = Budget::default();
    assert_eq!(budget.max_steps, 10);
    assert_eq!(budget.max_tokens, 10_000);
    assert_eq!(budget.max_wall_time_seconds, 300.0);
    assert_eq!(budget.steps_used, 0);
    assert!(!budget.is_exceeded());
}

#[test]
fn budget_exceeded_on_steps() {
    let mut budget = Budget { max_steps: 5, ..Budget::default() };
    assert!(!budget.is_exceeded());
    budget.steps_used = 5;
    assert!(budget.is_exceeded());
}

#[test]
fn budget_exceeded_on_tokens() {
    let mut budget = Budget { max_tokens: 1000, ..Budget::default() };
    assert!(!budget.is_exceeded());
    budget.tokens_used = 1000;
    assert!(budget.is_exceeded());
}

#[test]
fn budget_exceeded_on_wall_time() {
    let mut budget = Budget { max_wall_time_seconds: 60.0, ..Budget::default() };
    assert!(!budget.is_exceeded());
    budget.wall_time_used = 60.0;
    assert!(budget.is_exceeded());
}

#[test]
fn context_flags_defaults() {
    let flags = ContextFlags::default();
    assert!(!flags.dry_run);
    assert!(!flags.require_confirmation);
    assert!(flags.enable_reflection);
    assert!(flags.enable_verification);
}

#[test]
fn agent_state_creation_defaults() {
    let state = AgentState::new("test-123");
    assert_eq!(state.trace_id, "test-123");
    assert_eq!(state.user, "");
    assert!(state.messages.is_empty());
    assert!(state.plan.is_empty());
    assert_eq!(state.current_step, 0);
    assert_eq!(state.status, AgentStatus::Pending);
}

#[test]
fn agent_state_round_trips_through_json() {
    let mut original = AgentState::new("test-789");
    original.user = "charlie".to_string();
    original.messages.push(json!({"role": "user", "content": "Do something"}));
    original.plan.push(PlanStep { tool: "task_create".to_string(), args: json!({"title": "Task 1"}), dry_run: false });
    original.budget.steps_used = 3;
    original.flags.dry_run = true;

    let data = original.to_json();
    let restored = AgentState::from_json(data).unwrap();

    assert_eq!(restored.trace_id, original.trace_id);
    assert_eq!(restored.user, original.user);
    assert_eq!(restored.messages.len(), original.messages.len());
    assert_eq!(restored.plan.len(), original.plan.len());
    assert_eq!(restored.budget.steps_used, original.budget.steps_used);
    assert_eq!(restored.flags.dry_run, original.flags.dry_run);
}

#[test]
fn agent_state_from_json_with_explicit_status() {
    let data = json!({
        "trace_id": "test-456",
        "user": "bob",
        "messages": [{"role": "user", "content": "Test"}],
        "plan": [{"tool": "task_list", "args": {}}],
        "current_step": 1,
        "status": "executing",
        "budget": {
            "max_steps": 5,
            "steps_used": 2,
            "max_tokens": 5000,
            "tokens_used": 1000,
            "max_wall_time_seconds": 120.0,
            "wall_time_used": 30.0,
        },
        "flags": {
            "dry_run": true,
            "enable_reflection": false,
            "enable_verification": true,
            "require_confirmation": false,
        },
    });

    let state = AgentState::from_json(data).unwrap();
    assert_eq!(state.trace_id, "test-456");
    assert_eq!(state.current_step, 1);
    assert_eq!(state.status, AgentStatus::Executing);
    assert_eq!(state.budget.steps_used, 2);
    assert!(state.flags.dry_run);
}

#[test]
fn agent_state_tracks_error_and_retry_count() {
    let mut state = AgentState::new("test-error");
    assert!(state.error.is_none());
    assert_eq!(state.retry_count, 0);

    state.error = Some("Something went wrong".to_string());
    state.retry_count = 1;

    assert_eq!(state.error.as_deref(), Some("Something went wrong"));
    assert_eq!(state.retry_count, 1);
}

#[test]
fn agent_state_tool_results_accumulate() {
    let mut state = AgentState::new("test-results");
    assert!(state.tool_results.is_empty());

    state.tool_results.push(ToolResult {
        tool: "task_create".to_string(),
        step: 0,
        status: "ok".to_string(),
        data: json!({"id": "task-1"}),
    });

    assert_eq!(state.tool_results.len(), 1);
    assert_eq!(state.tool_results[0].status, "ok");
}
