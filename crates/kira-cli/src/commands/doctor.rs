// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kiractl doctor`: runs the aggregated health checks (C17) and surfaces
//! their exit code unchanged, so scripts can gate on it directly.

use std::path::{Path, PathBuf};

use kira_maintenance::{run_doctor, DoctorConfig, DoctorReport};

pub fn run(vault_path: &Path, audit_dir: &Path, config_path: Option<&Path>) -> DoctorReport {
    let config = DoctorConfig {
        vault_path: vault_path.to_path_buf(),
        audit_dir: audit_dir.to_path_buf(),
        config_path: config_path.map(PathBuf::from),
    };
    run_doctor(&config)
}
