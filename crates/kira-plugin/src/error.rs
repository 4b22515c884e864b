// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin-crate error vocabulary; converges into [`kira_core::KiraError`]
//! at the crate boundary.

use kira_core::KiraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("import scan rejected `{module}` in {file}")]
    DisallowedImport { file: String, module: String },

    #[error("plugin I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wasm activation failed: {0}")]
    Wasm(String),

    #[error("plugin entry `{entry}` did not return {{status: \"ok\"}}: {detail}")]
    EntryFailed { entry: String, detail: String },
}

impl From<PluginError> for KiraError {
    fn from(err: PluginError) -> Self {
        match err {
            PluginError::Manifest(msg) => KiraError::Validation(msg),
            PluginError::DisallowedImport { file, module } => {
                KiraError::Validation(format!("{file}: disallowed import `{module}`"))
            }
            PluginError::Io(err) => KiraError::Io(err),
            PluginError::Wasm(msg) => KiraError::Remote { retryable: false, message: msg },
            PluginError::EntryFailed { entry, detail } => {
                KiraError::Validation(format!("plugin entry `{entry}` failed: {detail}"))
            }
        }
    }
}
