// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-wide error vocabulary. Per-crate errors `#[from]`-convert into this
//! at the boundary, mirroring how the engine's `RuntimeError` wraps
//! `ExecuteError`.

use thiserror::Error;

/// Unified error kind for anything that crosses a Kira component boundary.
#[derive(Debug, Error)]
pub enum KiraError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("fsm guard violation: cannot transition from {from} to {to}")]
    FsmGuard { from: String, to: String },

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("policy violation: {0}")]
    PolicyViolation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote error (retryable={retryable}): {message}")]
    Remote { retryable: bool, message: String },

    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("duplicate event: {0}")]
    DuplicateEvent(String),

    #[error("config error: {0}")]
    Config(String),
}

impl KiraError {
    /// Exit code mapping surfaced by `kiractl`: `0` success, `2`
    /// validation, `3` idempotent-no-op, `4` FSM guard violation, `5` I/O
    /// or lock error, `6` policy violation, `7` unknown/not-found error.
    pub fn exit_code(&self) -> i32 {
        match self {
            KiraError::Validation(_) => 2,
            KiraError::Config(_) => 2,
            KiraError::DuplicateEvent(_) => 3,
            KiraError::FsmGuard { .. } => 4,
            KiraError::Io(_) => 5,
            KiraError::PolicyViolation(_) => 6,
            KiraError::NotFound(_) => 7,
            KiraError::Remote { .. } => 7,
            KiraError::BudgetExceeded(_) => 7,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            KiraError::Validation(_) => "validation",
            KiraError::FsmGuard { .. } => "fsm_guard",
            KiraError::NotFound(_) => "not_found",
            KiraError::PolicyViolation(_) => "policy_violation",
            KiraError::Io(_) => "io",
            KiraError::Remote { .. } => "remote",
            KiraError::BudgetExceeded(_) => "budget_exceeded",
            KiraError::DuplicateEvent(_) => "duplicate_event",
            KiraError::Config(_) => "config",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
