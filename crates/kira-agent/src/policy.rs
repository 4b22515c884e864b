// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Policy Enforcer (C12): capability-based access control at the tool
//! execution boundary. Ported verbatim from
//! `original_source/src/kira/agent/policies.py`'s `AgentPolicy`/
//! `PolicyManager` default and `check_permission`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A coarse-grained action an agent may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Create,
    Update,
    Delete,
    Export,
}

/// The capabilities a tool requires, and whether it is destructive
/// (destructive tools always require confirmation regardless of
/// `PolicyConfig::require_confirmation`).
#[derive(Debug, Clone)]
pub struct ToolPolicy {
    pub required_capabilities: Vec<Capability>,
    pub destructive: bool,
}

/// Maps built-in tool names to the capability/destructiveness they carry,
/// mirroring `original_source/src/kira/agent/policies.py`'s
/// `TOOL_CAPABILITIES` table.
pub fn tool_policy(tool: &str) -> Option<ToolPolicy> {
    let (capability, destructive) = match tool {
        "task_create" => (Capability::Create, false),
        "task_update" => (Capability::Update, false),
        "task_delete" => (Capability::Delete, true),
        "task_get" => (Capability::Read, false),
        "task_list" => (Capability::Read, false),
        "rollup_daily" => (Capability::Read, false),
        "vault_export" => (Capability::Export, true),
        _ => return None,
    };
    Some(ToolPolicy { required_capabilities: vec![capability], destructive })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("tool '{tool}' requires capability '{capability:?}' which is not allowed")]
pub struct PolicyViolation {
    pub tool: String,
    pub capability: Capability,
    pub needs_confirmation: bool,
}

/// The active policy: which capabilities are enabled, an optional tool
/// allowlist, which tools always need `--yes` confirmation, and a cap on
/// tool calls per agent run. Defaults match
/// `original_source/src/kira/agent/policies.py`'s `PolicyManager._load_policy`
/// fallback: `{Read, Create, Update, Export}` allowed, `Delete` disabled,
/// `task_delete`/`vault_export` require confirmation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PolicyConfig {
    pub allowed_capabilities: HashSet<Capability>,
    pub allowed_tools: Option<HashSet<String>>,
    pub require_confirmation: HashSet<String>,
    pub max_tool_calls_per_request: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_capabilities: HashSet::from([
                Capability::Read,
                Capability::Create,
                Capability::Update,
                Capability::Export,
            ]),
            allowed_tools: None,
            require_confirmation: HashSet::from(["task_delete".to_string(), "vault_export".to_string()]),
            max_tool_calls_per_request: 10,
        }
    }
}

impl PolicyConfig {
    /// Loads a policy from `path`, falling back to [`PolicyConfig::default`]
    /// on any read or parse error — matching
    /// `PolicyManager._load_policy`'s "fall back to default on error".
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        std::fs::write(path, text)
    }

    fn can_execute(&self, tool: &str, capability: Capability) -> bool {
        if !self.allowed_capabilities.contains(&capability) {
            return false;
        }
        if let Some(allowed_tools) = &self.allowed_tools {
            if !allowed_tools.contains(tool) {
                return false;
            }
        }
        true
    }

    fn requires_confirmation(&self, tool: &str) -> bool {
        self.require_confirmation.contains(tool)
    }
}

/// Enforces [`PolicyConfig`] at the tool execution boundary. Owns the
/// on-disk path it was loaded from so callers can persist edits.
pub struct PolicyManager {
    policy_path: Option<PathBuf>,
    policy: PolicyConfig,
}

impl PolicyManager {
    pub fn new(policy_path: Option<PathBuf>) -> Self {
        let policy = match &policy_path {
            Some(path) if path.exists() => PolicyConfig::load(path),
            _ => PolicyConfig::default(),
        };
        Self { policy_path, policy }
    }

    pub fn with_policy(policy: PolicyConfig) -> Self {
        Self { policy_path: None, policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut PolicyConfig {
        &mut self.policy
    }

    pub fn save(&self) -> std::io::Result<()> {
        match &self.policy_path {
            Some(path) => self.policy.save(path),
            None => Ok(()),
        }
    }

    /// Checks whether `tool`, requiring `required_capabilities`, may run.
    /// `confirmed` reflects the caller's `--yes`/confirmation flag. A
    /// destructive tool requires confirmation regardless of whether it
    /// also appears in `require_confirmation`.
    pub fn check(
        &self,
        tool: &str,
        required_capabilities: &[Capability],
        destructive: bool,
        confirmed: bool,
    ) -> Result<(), PolicyViolation> {
        for capability in required_capabilities {
            if !self.policy.can_execute(tool, *capability) {
                return Err(PolicyViolation {
                    tool: tool.to_string(),
                    capability: *capability,
                    needs_confirmation: false,
                });
            }
        }

        if (destructive || self.policy.requires_confirmation(tool)) && !confirmed {
            let capability = required_capabilities.first().copied().unwrap_or(Capability::Read);
            return Err(PolicyViolation {
                tool: tool.to_string(),
                capability,
                needs_confirmation: true,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
