// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maintenance-local error vocabulary; converges into [`kira_core::KiraError`]
//! at the crate boundary.

use kira_core::KiraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("vault error: {0}")]
    Vault(#[from] kira_vault::VaultError),

    #[error("restore path exists and overwrite was not requested: {0}")]
    RestorePathExists(String),

    #[error("backup archive has an unexpected layout: {0}")]
    MalformedArchive(String),
}

impl From<MaintenanceError> for KiraError {
    fn from(err: MaintenanceError) -> Self {
        match err {
            MaintenanceError::Io(e) => KiraError::Io(e),
            MaintenanceError::Vault(e) => e.into(),
            MaintenanceError::RestorePathExists(path) => {
                KiraError::Validation(format!("restore path exists: {path}"))
            }
            MaintenanceError::MalformedArchive(msg) => KiraError::Validation(msg),
        }
    }
}
