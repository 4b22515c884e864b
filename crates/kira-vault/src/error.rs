// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Vault-local error vocabulary; converges into [`kira_core::KiraError`] at
//! the crate boundary.

use kira_core::KiraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt front-matter in {path}: {message}")]
    Corrupt { path: String, message: String },
}

impl From<VaultError> for KiraError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::NotFound(id) => KiraError::NotFound(id),
            VaultError::Io(e) => KiraError::Io(e),
            VaultError::Corrupt { path, message } => {
                KiraError::Io(std::io::Error::other(format!("{path}: {message}")))
            }
        }
    }
}
