// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus/pipeline error vocabulary; converges into [`kira_core::KiraError`]
//! at the crate boundary.

use kira_core::KiraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("inbox source error: {0}")]
    Source(String),

    #[error("sync adapter error: {0}")]
    Adapter(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BusError> for KiraError {
    fn from(err: BusError) -> Self {
        match err {
            BusError::Source(msg) => KiraError::Remote {
                retryable: true,
                message: msg,
            },
            BusError::Adapter(msg) => KiraError::Remote {
                retryable: true,
                message: msg,
            },
            BusError::Io(e) => KiraError::Io(e),
        }
    }
}
