// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`PluginContext`]: the only surface a loaded plugin sees — a logger,
//! an Event Bus handle, a Scheduler handle, a per-plugin key-value
//! namespace, a secrets accessor, and a Vault facade
//! that is exactly the Host API (never the raw filesystem), matching
//! `original_source/tests/unit/test_plugin_fs_restrictions.py`'s ADR-006
//! intent. The key-value store and secrets accessor are namespaced per
//! plugin `name` so one plugin can never read or clobber another's state,
//! grounded on `oj-adapters::env`'s centralized env-var accessor pattern.

use std::collections::HashMap;
use std::sync::Arc;

use kira_bus::{EventBus, Scheduler};
use kira_host::HostApi;
use parking_lot::Mutex;

/// A plugin-namespaced key-value store, held in memory for the lifetime of
/// the [`PluginHost`](crate::host::PluginHost). Not persisted across process
/// restarts; a plugin needing durability writes entities through the vault
/// facade instead.
#[derive(Default)]
pub struct PluginKvStore {
    values: Mutex<HashMap<String, String>>,
}

impl PluginKvStore {
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.lock().insert(key.into(), value.into());
    }
}

/// Reads plugin secrets from `KIRA_PLUGIN_SECRET_<PLUGIN_SLUG>_<KEY>`
/// environment variables, scoped by the plugin's manifest `name`. No
/// secret ever touches the vault or the audit log.
pub struct SecretsAccessor {
    plugin_slug: String,
}

impl SecretsAccessor {
    pub fn new(plugin_name: &str) -> Self {
        Self { plugin_slug: plugin_name.trim_start_matches("kira-").to_uppercase().replace('-', "_") }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let var = format!("KIRA_PLUGIN_SECRET_{}_{}", self.plugin_slug, key.to_uppercase());
        std::env::var(var).ok()
    }
}

/// The sandboxed execution context passed into a plugin's entry function.
/// Holds only what a sandboxed plugin is authorized to touch: no direct
/// filesystem or network handle is ever exposed here.
pub struct PluginContext {
    pub plugin_name: String,
    pub vault: Arc<HostApi>,
    pub bus: Arc<EventBus>,
    pub scheduler: Arc<Scheduler>,
    pub kv: PluginKvStore,
    pub secrets: SecretsAccessor,
}

impl PluginContext {
    pub fn new(
        plugin_name: impl Into<String>,
        vault: Arc<HostApi>,
        bus: Arc<EventBus>,
        scheduler: Arc<Scheduler>,
    ) -> Self {
        let plugin_name = plugin_name.into();
        let secrets = SecretsAccessor::new(&plugin_name);
        Self { plugin_name, vault, bus, scheduler, kv: PluginKvStore::default(), secrets }
    }

    pub fn log_info(&self, message: &str) {
        tracing::info!(plugin = %self.plugin_name, "{message}");
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
