// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A canned chat provider standing in for a real HTTP-backed LLM, the way
//! `oj-adapters` ships `FakeAgentAdapter` alongside its real adapters.
//! Concrete provider transport is out of scope for this build; this keeps
//! the Agent Graph (C13) exercisable end to end without a network call.

use async_trait::async_trait;
use kira_agent::{ChatOptions, LlmError, LlmProvider, LlmResponse, Message};

/// Returns `plan` verbatim (a JSON array of `{tool, args}` steps) when
/// asked to plan, and `reply` for every other task type.
pub struct FakeLlmProvider {
    plan: String,
    reply: String,
}

impl FakeLlmProvider {
    pub fn new(plan: impl Into<String>, reply: impl Into<String>) -> Self {
        Self { plan: plan.into(), reply: reply.into() }
    }

    /// A provider that never proposes a tool call, for commands that only
    /// want the Agent Graph's conversational `Respond` node.
    pub fn conversational(reply: impl Into<String>) -> Self {
        Self::new("[]", reply)
    }
}

#[async_trait]
impl LlmProvider for FakeLlmProvider {
    async fn chat(&self, messages: &[Message], _opts: &ChatOptions) -> Result<LlmResponse, LlmError> {
        let asked_to_plan = messages
            .iter()
            .any(|m| m.content.contains("JSON array of"));
        if asked_to_plan {
            Ok(LlmResponse::new(self.plan.clone()))
        } else {
            Ok(LlmResponse::new(self.reply.clone()))
        }
    }
}
