// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WASM plugin activation via `extism`, grounded on
//! `querymt-querymt::crates/querymt/src/plugin/extism_impl/host` for the
//! real `extism::{Manifest, Plugin, PluginBuilder, Wasm}` usage pattern —
//! deliberately simplified relative to querymt's LLM-provider-as-plugin
//! use case: one host function (`functions::kira_host_call`), no
//! streaming, one blocking `activate` call per load.

mod functions;

use std::path::Path;
use std::sync::Arc;

use extism::{Manifest, PluginBuilder, Wasm};
use kira_bus::{EventBus, Scheduler};
use kira_host::HostApi;
use serde::Deserialize;
use serde_json::json;

use crate::context::PluginContext;
use crate::error::PluginError;
use crate::manifest::{PluginManifest, PluginManifestValidator};
use crate::scanner::ImportScanner;

/// The shape every plugin entry point is required to return.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivationResult {
    pub status: String,
    pub plugin: String,
}

/// Loads and activates plugins: manifest validation, static import
/// scanning, then WASM activation under the one allowed host function.
pub struct PluginHost {
    scanner: ImportScanner,
    validator: PluginManifestValidator,
}

impl PluginHost {
    pub fn new() -> Self {
        Self {
            scanner: ImportScanner::new(),
            validator: PluginManifestValidator::new(),
        }
    }

    /// Validates `plugin_dir`'s manifest and source tree, then activates
    /// its compiled guest module. `plugin_dir` must contain
    /// `kira-plugin.json`, a `src/` tree (scanned for disallowed imports),
    /// and `<entry-module>.wasm` (the compiled guest).
    ///
    /// Order matters: the manifest is validated and the source tree is
    /// scanned *before* any WASM module is loaded, so a rejected plugin
    /// never executes a single instruction.
    pub fn load(
        &self,
        plugin_dir: &Path,
        vault: Arc<HostApi>,
        bus: Arc<EventBus>,
        scheduler: Arc<Scheduler>,
    ) -> Result<(PluginManifest, ActivationResult), PluginError> {
        let manifest_path = plugin_dir.join("kira-plugin.json");
        let manifest = self.validator.validate_file(&manifest_path)?;

        let src_dir = plugin_dir.join("src");
        let violations = self.scanner.scan_dir(&src_dir)?;
        if let Some(violation) = violations.into_iter().next() {
            return Err(PluginError::DisallowedImport {
                file: violation.file,
                module: violation.module,
            });
        }

        let (module, function) = manifest
            .entry
            .split_once(':')
            .ok_or_else(|| PluginError::Manifest(format!("malformed entry `{}`", manifest.entry)))?;

        let wasm_path = plugin_dir.join(format!("{module}.wasm"));
        if !wasm_path.exists() {
            return Err(PluginError::Wasm(format!(
                "entry module `{module}` has no matching `{}`",
                wasm_path.display()
            )));
        }

        let context = PluginContext::new(manifest.name.clone(), vault, bus, scheduler);
        let user_data = extism::UserData::new(Arc::new(context));

        let ext_manifest = Manifest::new([Wasm::file(&wasm_path)]);
        let mut plugin = PluginBuilder::new(ext_manifest)
            .with_wasi(true)
            .with_function_in_namespace(
                "kira:host/user",
                "kira_host_call",
                [extism::PTR],
                [extism::PTR],
                user_data,
                functions::kira_host_call,
            )
            .build()
            .map_err(|e| PluginError::Wasm(e.to_string()))?;

        let activation_input = json!({
            "plugin": manifest.name,
            "capabilities": manifest.capabilities,
            "permissions": manifest.permissions,
        });
        let input_bytes =
            serde_json::to_vec(&activation_input).map_err(|e| PluginError::Wasm(e.to_string()))?;

        let output_bytes: Vec<u8> = plugin
            .call(function, &input_bytes)
            .map_err(|e| PluginError::Wasm(e.to_string()))?;

        let result: ActivationResult = serde_json::from_slice(&output_bytes).map_err(|e| PluginError::EntryFailed {
            entry: manifest.entry.clone(),
            detail: e.to_string(),
        })?;

        if result.status != "ok" || result.plugin != manifest.name {
            return Err(PluginError::EntryFailed {
                entry: manifest.entry.clone(),
                detail: format!("unexpected activation result {result:?}"),
            });
        }

        Ok((manifest, result))
    }
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
