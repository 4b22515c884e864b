// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The composition root: builds every long-lived collaborator from a
//! loaded [`KiraConfig`] once per invocation, the way `oj-daemon`'s
//! startup wires its storage/engine/adapter stack from one `Config`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kira_agent::{Capability, LlmRouter, PolicyConfig as AgentPolicyConfig, PolicyManager, RouterConfig};
use kira_bus::EventBus;
use kira_core::{Clock, KiraConfig, KiraError, SystemClock};
use kira_host::HostApi;
use kira_maintenance::AuditLogger;
use kira_vault::{DedupeStore, VaultStore};

use crate::llm::FakeLlmProvider;

/// Every collaborator a `kiractl` command might need. Built once in
/// `main` and handed to whichever subcommand handler runs.
pub struct App {
    pub config: KiraConfig,
    pub vault_path: PathBuf,
    pub clock: Arc<dyn Clock>,
    pub bus: Arc<EventBus>,
    pub host: Arc<HostApi>,
    pub dedupe: Arc<DedupeStore>,
    pub audit: Arc<AuditLogger>,
    pub policy: PolicyManager,
}

/// Expands a leading `~` to the user's home directory; any other path is
/// returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| PathBuf::from(path)),
        None if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

fn capability_from_str(name: &str) -> Option<Capability> {
    match name {
        "read" => Some(Capability::Read),
        "create" => Some(Capability::Create),
        "update" => Some(Capability::Update),
        "delete" => Some(Capability::Delete),
        "export" => Some(Capability::Export),
        other => {
            tracing::warn!(capability = other, "unrecognized policy capability, ignoring");
            None
        }
    }
}

/// Translates `kira_core::config::PolicyConfig`'s string-based wire format
/// into the `Capability`-typed config the Policy Enforcer (C12) checks
/// against.
fn agent_policy_from_config(config: &kira_core::config::PolicyConfig) -> AgentPolicyConfig {
    AgentPolicyConfig {
        allowed_capabilities: config.allowed_capabilities.iter().filter_map(|s| capability_from_str(s)).collect(),
        allowed_tools: config.allowed_tools.as_ref().map(|tools| tools.iter().cloned().collect()),
        require_confirmation: config.require_confirmation.iter().cloned().collect(),
        max_tool_calls_per_request: config.max_tool_calls_per_request,
    }
}

impl App {
    /// Loads `config_path` (falling back to defaults if absent, per
    /// `KiraConfig::load`) and wires the Vault Store, Event Bus, Host API,
    /// dedupe index, and Audit Logger from it. `vault_override` lets
    /// `--vault` on the CLI win over the config file's `vault.path`.
    pub fn bootstrap(config_path: &Path, vault_override: Option<&Path>) -> Result<Self, KiraError> {
        let config = KiraConfig::load(config_path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to default configuration");
            KiraConfig::default()
        });

        let vault_path = vault_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| expand_tilde(&config.vault.path));
        std::fs::create_dir_all(&vault_path)?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(&config.vault.tz));
        let bus = Arc::new(EventBus::new());
        let vault = Arc::new(VaultStore::new(vault_path.clone(), config.vault.enable_file_locks));
        let host = Arc::new(HostApi::new(vault, bus.clone(), clock.clone()));

        let dedupe_path = vault_path.join("artifacts").join("dedupe.db");
        let dedupe = Arc::new(DedupeStore::open(dedupe_path)?);

        let audit = Arc::new(AuditLogger::new(PathBuf::from("artifacts").join("audit"), clock.clone()));

        let policy = PolicyManager::with_policy(agent_policy_from_config(&config.policy));

        Ok(Self { config, vault_path, clock, bus, host, dedupe, audit, policy })
    }

    /// Builds a fresh [`PolicyManager`] from `self.config.policy`. `PolicyManager`
    /// isn't `Clone` (it owns the path it was loaded from), so callers that need
    /// to hand one by value to the Agent Graph (C13) build their own rather than
    /// moving `self.policy`, which the rest of a `kiractl` invocation still needs.
    pub fn build_policy_manager(&self) -> PolicyManager {
        PolicyManager::with_policy(agent_policy_from_config(&self.config.policy))
    }

    /// Builds the LLM Router (C10) wired to a [`FakeLlmProvider`] for
    /// every task type, the way `oj-adapters`' `Fake*` pattern wires a demo
    /// run, scaled down to one provider name.
    pub fn router(&self, plan: impl Into<String>, reply: impl Into<String>) -> LlmRouter {
        let provider: Arc<dyn kira_agent::LlmProvider> = Arc::new(FakeLlmProvider::new(plan, reply));
        let mut providers = HashMap::new();
        providers.insert("default".to_string(), provider);
        let router_config = RouterConfig {
            planning_provider: self.config.router.planning_provider.clone(),
            structuring_provider: self.config.router.structuring_provider.clone(),
            default_provider: self.config.router.default_provider.clone(),
            enable_local_fallback: self.config.router.enable_local_fallback,
            local_fallback_provider: self.config.router.local_fallback_provider.clone(),
            max_retries: self.config.router.max_retries,
        };
        LlmRouter::new(router_config, providers)
    }
}

/// A user message wrapped as the raw JSON object shape `AgentState.messages`
/// expects (see `kira_agent::state::AgentState`).
pub fn user_message_json(text: &str) -> serde_json::Value {
    serde_json::json!({"role": "user", "content": text})
}
