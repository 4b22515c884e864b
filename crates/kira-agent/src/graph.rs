// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Agent Graph (C13): the deterministic node sequence `Plan ->
//! ValidateArgs -> CheckPolicy -> ExecuteTool (looped) -> Reflect
//! (optional) -> Verify (optional) -> Respond`, implemented as a plain
//! `match` over [`AgentStatus`] rather than a ported graph-execution
//! library — grounded on `oj-engine::runtime`'s hand-written dispatch over
//! `Event` variants (`runtime/handlers/mod.rs`). The "langgraph state
//! machine" of `original_source/tests/unit/test_langgraph_state.py` is
//! reimplemented here as this state machine, not a port of a graph crate.

pub mod execute;

use std::sync::Arc;
use std::time::{Duration, Instant};

use kira_host::HostApi;
use serde_json::{json, Value};

use crate::error::AgentError;
use crate::policy::{tool_policy, PolicyManager};
use crate::router::{ChatOptions, LlmRouter, Message, TaskType};
use crate::state::{AgentState, AgentStatus, ToolResult};
use crate::tools::validate_tool_args;
use execute::{execute_step, ExecuteConfig};

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("policy violation: tool '{tool}' requires confirmation or a disallowed capability")]
    PolicyViolation { tool: String },

    #[error(transparent)]
    Tool(#[from] AgentError),
}

/// Drives one agent run through the node sequence. Holds the collaborators
/// every node needs; stateless otherwise — all run-scoped data lives in
/// the [`AgentState`] passed to [`AgentGraph::run`].
pub struct AgentGraph {
    router: Arc<LlmRouter>,
    policy: PolicyManager,
    host: Arc<HostApi>,
    execute_config: ExecuteConfig,
}

impl AgentGraph {
    pub fn new(router: Arc<LlmRouter>, policy: PolicyManager, host: Arc<HostApi>) -> Self {
        Self { router, policy, host, execute_config: ExecuteConfig::default() }
    }

    pub fn with_execute_config(mut self, config: ExecuteConfig) -> Self {
        self.execute_config = config;
        self
    }

    /// Drives `state` from its current status to a terminal one
    /// (`Responded` or `Error`). `confirmed` reflects the caller's
    /// `--yes`/confirmation flag, checked by `CheckPolicy` for destructive
    /// tools.
    pub async fn run(&self, state: &mut AgentState, confirmed: bool) -> Result<(), GraphError> {
        loop {
            if matches!(state.status, AgentStatus::Responded | AgentStatus::Error) {
                return Ok(());
            }
            if state.budget.is_exceeded() {
                state.error = Some("agent budget exceeded".to_string());
                state.status = AgentStatus::Error;
                return Err(GraphError::BudgetExceeded(state.trace_id.clone()));
            }

            if let Err(err) = self.step(state, confirmed).await {
                state.error = Some(err.to_string());
                state.status = AgentStatus::Error;
                return Err(err);
            }
        }
    }

    async fn step(&self, state: &mut AgentState, confirmed: bool) -> Result<(), GraphError> {
        match state.status {
            AgentStatus::Pending => {
                state.status = AgentStatus::Planning;
                Ok(())
            }
            AgentStatus::Planning => self.plan_node(state).await,
            AgentStatus::Validating => self.validate_args_node(state),
            AgentStatus::CheckingPolicy => self.check_policy_node(state, confirmed),
            AgentStatus::Executing => self.execute_tool_node(state).await,
            AgentStatus::Reflecting => {
                state.status = AgentStatus::Verifying;
                Ok(())
            }
            AgentStatus::Verifying => {
                state.status = AgentStatus::Verified;
                Ok(())
            }
            AgentStatus::Verified => {
                state.status = AgentStatus::Responding;
                Ok(())
            }
            AgentStatus::Responding => self.respond_node(state).await,
            AgentStatus::Responded | AgentStatus::Error => Ok(()),
        }
    }

    /// `Plan`: asks the router (task type [`TaskType::Planning`]) for a
    /// JSON array of `{tool, args}` steps. An empty or unparsable plan is
    /// treated as "nothing to do" rather than an error, so a conversational
    /// message with no actionable request still reaches `Respond`.
    async fn plan_node(&self, state: &mut AgentState) -> Result<(), GraphError> {
        let user_request = latest_user_message(state);
        let prompt = vec![
            Message::system(
                "Respond with a JSON array of {\"tool\": ..., \"args\": {...}} steps needed to satisfy the request. \
                 Respond with `[]` if no tool call is needed.",
            ),
            Message::user(user_request),
        ];

        let response = self.router.chat(&prompt, TaskType::Planning, &ChatOptions::default()).await;
        state.plan = match response {
            Ok(resp) => parse_plan(&resp.content),
            Err(_) => Vec::new(),
        };
        state.current_step = 0;
        state.status = AgentStatus::Validating;
        Ok(())
    }

    /// `ValidateArgs`: every planned step's arguments must pass its tool's
    /// schema before anything is checked for policy or executed.
    fn validate_args_node(&self, state: &mut AgentState) -> Result<(), GraphError> {
        for step in &state.plan {
            validate_tool_args(&step.tool, &step.args)
                .map_err(|e| GraphError::Validation(format!("{}: {e}", step.tool)))?;
        }
        state.status = AgentStatus::CheckingPolicy;
        Ok(())
    }

    /// `CheckPolicy`: every planned step must be permitted by the active
    /// policy, and any destructive/confirmation-requiring step must carry
    /// `confirmed`.
    fn check_policy_node(&self, state: &mut AgentState, confirmed: bool) -> Result<(), GraphError> {
        for step in &state.plan {
            let Some(tp) = tool_policy(&step.tool) else {
                return Err(GraphError::Validation(format!("no policy mapping for tool `{}`", step.tool)));
            };
            self.policy
                .check(&step.tool, &tp.required_capabilities, tp.destructive, confirmed)
                .map_err(|_| GraphError::PolicyViolation { tool: step.tool.clone() })?;
        }
        state.status = AgentStatus::Executing;
        Ok(())
    }

    /// `ExecuteTool`, looped: runs one plan step per call so budget and
    /// termination checks happen between every tool invocation, then
    /// advances to `Reflect` once the plan is exhausted.
    async fn execute_tool_node(&self, state: &mut AgentState) -> Result<(), GraphError> {
        if state.current_step >= state.plan.len() {
            state.status = AgentStatus::Reflecting;
            return Ok(());
        }

        let step = state.plan[state.current_step].clone();
        let started = Instant::now();
        let result: ToolResult =
            execute_step(&self.host, &step, state.current_step, &state.trace_id, self.execute_config).await?;

        state.budget.record_step(0, started.elapsed().max(Duration::from_millis(1)));
        state.tool_results.push(result);
        state.current_step += 1;
        Ok(())
    }

    /// `Respond`: generates a natural-language summary of what happened,
    /// at a higher temperature than planning calls. Falls back to a
    /// deterministic `"Done."` on LLM failure so this boundary never
    /// panics — grounded on
    /// `original_source/tests/unit/test_respond_node.py`'s expectation
    /// that `respond_node` always yields `status: "responded"`.
    async fn respond_node(&self, state: &mut AgentState) -> Result<(), GraphError> {
        let user_request = latest_user_message(state);
        let results_summary = serde_json::to_string(&state.tool_results).unwrap_or_default();
        let mut prompt_body = format!("User asked: {user_request}\n\nTool results: {results_summary}");
        if let Some(error) = &state.error {
            prompt_body.push_str(&format!("\n\nERROR: {error}"));
        }

        // Friendly, conversational, natural-sounding tone — never a scripted template.
        let messages = vec![
            Message::system(
                "You are Kira, a friendly and conversational personal assistant. \
                 Respond in natural, warm language summarizing what was done.",
            ),
            Message::user(prompt_body),
        ];
        let opts = ChatOptions { temperature: Some(0.9), max_tokens: None };

        state.response = Some(
            match self.router.chat(&messages, TaskType::Default, &opts).await {
                Ok(resp) => resp.content,
                Err(_) => "Done.".to_string(),
            },
        );
        state.status = AgentStatus::Responded;
        Ok(())
    }
}

fn latest_user_message(state: &AgentState) -> String {
    state
        .messages
        .iter()
        .rev()
        .find_map(|m| {
            if m.get("role").and_then(Value::as_str) == Some("user") {
                m.get("content").and_then(Value::as_str).map(str::to_string)
            } else {
                None
            }
        })
        .unwrap_or_default()
}

fn parse_plan(content: &str) -> Vec<crate::state::PlanStep> {
    serde_json::from_str::<Value>(content.trim())
        .ok()
        .and_then(|v| v.as_array().cloned())
        .map(|items| {
            items
                .into_iter()
                .filter_map(|item| {
                    let tool = item.get("tool")?.as_str()?.to_string();
                    let args = item.get("args").cloned().unwrap_or(json!({}));
                    Some(crate::state::PlanStep { tool, args, dry_run: false })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
