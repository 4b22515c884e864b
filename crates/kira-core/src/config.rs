// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration loader for `kira.toml`. Every field is
//! `serde(default)` so a partial file is legal; unknown keys are collected
//! across the whole file rather than failing fast on the first one,
//! mirroring `oj-runbook::validate`'s "report every error at once" idiom.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::KiraError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VaultConfig {
    pub path: String,
    pub tz: String,
    pub enable_file_locks: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: "~/.kira/vault".to_string(),
            tz: crate::clock::DEFAULT_TZ.to_string(),
            enable_file_locks: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleanupConfig {
    pub dedupe_ttl_days: u32,
    pub quarantine_ttl_days: u32,
    pub log_ttl_days: u32,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            dedupe_ttl_days: 30,
            quarantine_ttl_days: 90,
            log_ttl_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackupConfig {
    pub dir: String,
    pub retention_count: u32,
    pub compress: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: "~/.kira/backups".to_string(),
            retention_count: 10,
            compress: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentBudgetConfig {
    pub max_steps: u32,
    pub max_tokens: u64,
    pub max_wall_time_secs: u64,
}

impl Default for AgentBudgetConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            max_tokens: 10_000,
            max_wall_time_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentFlagsConfig {
    pub dry_run: bool,
    pub require_confirmation: bool,
    pub enable_reflection: bool,
    pub enable_verification: bool,
}

impl Default for AgentFlagsConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            require_confirmation: false,
            enable_reflection: true,
            enable_verification: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    pub allowed_capabilities: Vec<String>,
    pub allowed_tools: Option<Vec<String>>,
    pub require_confirmation: Vec<String>,
    pub max_tool_calls_per_request: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_capabilities: vec![
                "read".to_string(),
                "create".to_string(),
                "update".to_string(),
                "export".to_string(),
            ],
            allowed_tools: None,
            require_confirmation: vec!["task_delete".to_string(), "vault_export".to_string()],
            max_tool_calls_per_request: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    pub planning_provider: String,
    pub structuring_provider: String,
    pub default_provider: String,
    pub enable_local_fallback: bool,
    pub local_fallback_provider: Option<String>,
    pub max_retries: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            planning_provider: "default".to_string(),
            structuring_provider: "default".to_string(),
            default_provider: "default".to_string(),
            enable_local_fallback: false,
            local_fallback_provider: None,
            max_retries: 3,
        }
    }
}

/// Top-level, typed view of `kira.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KiraConfig {
    pub vault: VaultConfig,
    pub cleanup: CleanupConfig,
    pub backup: BackupConfig,
    pub agent_budget: AgentBudgetConfig,
    pub agent_flags: AgentFlagsConfig,
    pub policy: PolicyConfig,
    pub router: RouterConfig,
}

const RECOGNIZED_TABLES: &[&str] = &[
    "vault",
    "cleanup",
    "backup",
    "agent_budget",
    "agent_flags",
    "policy",
    "router",
];

impl KiraConfig {
    /// Parses `text` as TOML, collecting every unrecognized top-level table
    /// name into a single `KiraError::Config` rather than stopping at the
    /// first typo.
    pub fn parse(text: &str) -> Result<Self, KiraError> {
        let raw: toml::Value =
            toml::from_str(text).map_err(|e| KiraError::Config(format!("invalid TOML: {e}")))?;

        let mut unknown = Vec::new();
        if let toml::Value::Table(table) = &raw {
            let recognized: HashSet<&str> = RECOGNIZED_TABLES.iter().copied().collect();
            for key in table.keys() {
                if !recognized.contains(key.as_str()) {
                    unknown.push(key.clone());
                }
            }
        }
        if !unknown.is_empty() {
            unknown.sort();
            return Err(KiraError::Config(format!(
                "unrecognized config key(s): {}",
                unknown.join(", ")
            )));
        }

        toml::from_str(text).map_err(|e| KiraError::Config(format!("invalid config: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, KiraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
