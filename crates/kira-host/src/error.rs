// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host API error vocabulary; converges into [`kira_core::KiraError`] at
//! the crate boundary.

use kira_core::KiraError;
use kira_vault::VaultError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("cannot transition task from {from} to {to}")]
    FsmGuard { from: String, to: String },

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("vault error: {0}")]
    Vault(#[from] VaultError),
}

impl From<HostError> for KiraError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Validation(msg) => KiraError::Validation(msg),
            HostError::FsmGuard { from, to } => KiraError::FsmGuard { from, to },
            HostError::NotFound(id) => KiraError::NotFound(id),
            HostError::Vault(VaultError::NotFound(id)) => KiraError::NotFound(id),
            HostError::Vault(err) => err.into(),
        }
    }
}
