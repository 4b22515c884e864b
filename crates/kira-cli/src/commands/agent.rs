// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kiractl agent ask`: drives one Agent Graph (C13) run against a canned
//! [`crate::llm::FakeLlmProvider`], for exercising planning/policy/response
//! wiring without a live model behind it.

use std::sync::Arc;

use kira_agent::{AgentGraph, AgentState, Budget, GraphError};
use kira_core::{KiraConfig, KiraError};
use kira_host::HostApi;
use serde_json::json;

use crate::compose::{user_message_json, App};
use super::Invocation;

fn budget_from_config(config: &KiraConfig) -> Budget {
    let mut budget = Budget::default();
    budget.max_steps = config.agent_budget.max_steps;
    budget.max_tokens = config.agent_budget.max_tokens;
    budget.max_wall_time_seconds = config.agent_budget.max_wall_time_secs as f64;
    budget
}

pub async fn ask(
    app: &App,
    host: Arc<HostApi>,
    inv: Invocation,
    message: &str,
    plan: &str,
    reply: &str,
) -> Result<serde_json::Value, KiraError> {
    let router = Arc::new(app.router(plan, reply));
    let policy = app.build_policy_manager();
    let graph = AgentGraph::new(router, policy, host);

    let mut state = AgentState::new(inv.trace_id);
    state.messages.push(user_message_json(message));
    state.budget = budget_from_config(&app.config);
    state.flags.dry_run = inv.dry_run;
    state.flags.enable_reflection = app.config.agent_flags.enable_reflection;
    state.flags.enable_verification = app.config.agent_flags.enable_verification;
    state.flags.require_confirmation = app.config.agent_flags.require_confirmation;

    graph
        .run(&mut state, inv.confirmed)
        .await
        .map_err(|err| match err {
            GraphError::BudgetExceeded(msg) => KiraError::BudgetExceeded(msg),
            GraphError::Validation(msg) => KiraError::Validation(msg),
            GraphError::PolicyViolation { tool } => {
                KiraError::PolicyViolation(format!("tool `{tool}` blocked by policy"))
            }
            GraphError::Tool(agent_err) => KiraError::Validation(agent_err.to_string()),
        })?;

    Ok(json!({
        "status": state.status,
        "response": state.response,
        "tool_results": state.tool_results,
        "steps_used": state.budget.steps_used,
    }))
}
