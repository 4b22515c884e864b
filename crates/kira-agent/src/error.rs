// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-crate error vocabulary; converges into [`kira_core::KiraError`] at
//! the crate boundary.

use kira_core::KiraError;
use kira_host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("policy violation: {0}")]
    PolicyViolation(String),

    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("llm error (retryable={retryable}): {message}")]
    Llm { retryable: bool, message: String },

    #[error(transparent)]
    Host(#[from] HostError),
}

impl From<AgentError> for KiraError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Validation(msg) => KiraError::Validation(msg),
            AgentError::UnknownTool(name) => {
                KiraError::Validation(format!("unknown tool: {name}"))
            }
            AgentError::PolicyViolation(msg) => KiraError::PolicyViolation(msg),
            AgentError::BudgetExceeded(msg) => KiraError::BudgetExceeded(msg),
            AgentError::Llm { retryable, message } => KiraError::Remote {
                retryable,
                message,
            },
            AgentError::Host(err) => err.into(),
        }
    }
}
