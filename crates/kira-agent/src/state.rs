// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Graph state (C13 data model): the mutable record threaded through
//! every node of one agent run. Grounded on
//! `original_source/tests/unit/test_langgraph_state.py`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Consumption limits for a single agent run. Defaults mirror
/// `original_source/tests/unit/test_langgraph_state.py::test_budget_creation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub max_steps: u32,
    pub max_tokens: u64,
    pub max_wall_time_seconds: f64,
    pub steps_used: u32,
    pub tokens_used: u64,
    pub wall_time_used: f64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_steps: 10,
            max_tokens: 10_000,
            max_wall_time_seconds: 300.0,
            steps_used: 0,
            tokens_used: 0,
            wall_time_used: 0.0,
        }
    }
}

impl Budget {
    pub fn is_exceeded(&self) -> bool {
        self.steps_used >= self.max_steps
            || self.tokens_used >= self.max_tokens
            || self.wall_time_used >= self.max_wall_time_seconds
    }

    pub fn record_step(&mut self, tokens: u64, elapsed: Duration) {
        self.steps_used += 1;
        self.tokens_used += tokens;
        self.wall_time_used += elapsed.as_secs_f64();
    }
}

/// Run-scoped behavior toggles. Defaults mirror
/// `test_langgraph_state.py::test_context_flags_defaults`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextFlags {
    pub dry_run: bool,
    pub require_confirmation: bool,
    pub enable_reflection: bool,
    pub enable_verification: bool,
}

impl Default for ContextFlags {
    fn default() -> Self {
        Self {
            dry_run: false,
            require_confirmation: false,
            enable_reflection: true,
            enable_verification: true,
        }
    }
}

/// Where [`AgentGraph::step`](crate::graph::AgentGraph::step) currently is
/// in the node sequence `Plan -> ValidateArgs -> CheckPolicy -> ExecuteTool
/// -> Reflect -> Verify -> Respond`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Pending,
    Planning,
    Validating,
    CheckingPolicy,
    Executing,
    Reflecting,
    Verifying,
    Verified,
    Responding,
    Responded,
    Error,
}

impl Default for AgentStatus {
    fn default() -> Self {
        AgentStatus::Pending
    }
}

/// One planned tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub tool: String,
    pub args: Value,
    #[serde(default)]
    pub dry_run: bool,
}

/// The outcome of executing one [`PlanStep`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool: String,
    pub step: usize,
    pub status: String,
    pub data: Value,
}

/// The full mutable state of one agent run, threaded through every graph
/// node. `messages` holds the running chat transcript as raw JSON objects
/// (role/content pairs), matching how `original_source`'s state dict
/// stores them for the LLM request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub trace_id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default)]
    pub plan: Vec<PlanStep>,
    #[serde(default)]
    pub current_step: usize,
    #[serde(default)]
    pub tool_results: Vec<ToolResult>,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub budget: Budget,
    #[serde(default)]
    pub flags: ContextFlags,
    pub error: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
    pub response: Option<String>,
}

impl AgentState {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            user: String::new(),
            session_id: String::new(),
            messages: Vec::new(),
            plan: Vec::new(),
            current_step: 0,
            tool_results: Vec::new(),
            status: AgentStatus::Pending,
            budget: Budget::default(),
            flags: ContextFlags::default(),
            error: None,
            retry_count: 0,
            response: None,
        }
    }

    /// Serializes for persistence or cross-process handoff.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Deserializes a value produced by [`AgentState::to_json`].
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
