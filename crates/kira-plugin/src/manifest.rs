// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin manifest schema and validation (`kira-plugin.json`), grounded on
//! `oj-runbook::validate`'s schema-before-filesystem-resolution discipline
//! and behaviorally on
//! `original_source/tests/unit/test_manifest_validation.py`'s "every
//! built-in manifest must satisfy the shared schema" contract.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Permissions a plugin may declare. Closed set: anything else in a
/// manifest's `permissions` array is a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    VaultRead,
    VaultWrite,
    EventSubscribe,
    EventPublish,
    Schedule,
    SecretsRead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestContributes {
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub commands: Vec<String>,
}

/// The parsed contents of a `kira-plugin.json`. Field names match the
/// manifest's JSON keys verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    pub version: String,
    pub display_name: String,
    pub description: String,
    pub publisher: String,
    pub engines: serde_json::Value,
    pub permissions: Vec<Permission>,
    pub entry: String,
    pub capabilities: Vec<String>,
    pub contributes: ManifestContributes,
}

#[allow(clippy::expect_used)]
fn entry_pattern() -> Regex {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*:[A-Za-z_][A-Za-z0-9_]*$")
        .expect("entry pattern is a constant, always valid")
}

#[allow(clippy::expect_used)]
fn name_pattern() -> Regex {
    Regex::new(r"^kira-[a-z0-9][a-z0-9-]*$").expect("name pattern is a constant, always valid")
}

/// Validates a [`PluginManifest`]'s required-key, `name`/`entry` shape,
/// and closed-`permissions` rules. Unlike
/// `original_source`'s Python validator (which also checks the
/// scaffold's on-disk package layout — `test_manifest_matches_scaffold_structure`),
/// this only validates the manifest document itself; [`PluginHost::load`](crate::host::PluginHost::load)
/// separately verifies `entry`'s module resolves against the scanned
/// source tree.
pub struct PluginManifestValidator;

impl PluginManifestValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_file(&self, path: &Path) -> Result<PluginManifest, PluginError> {
        let text = std::fs::read_to_string(path)?;
        let manifest: PluginManifest = serde_json::from_str(&text)
            .map_err(|e| PluginError::Manifest(format!("{}: {e}", path.display())))?;
        self.validate(&manifest)?;
        Ok(manifest)
    }

    pub fn validate(&self, manifest: &PluginManifest) -> Result<(), PluginError> {
        let mut errors = Vec::new();

        if !name_pattern().is_match(&manifest.name) {
            errors.push(format!("`name` must match `kira-<slug>`, got `{}`", manifest.name));
        }
        if semver::Version::parse(&manifest.version).is_err() {
            errors.push(format!("`version` is not valid semver: `{}`", manifest.version));
        }
        if manifest.display_name.trim().is_empty() {
            errors.push("`displayName` must not be empty".to_string());
        }
        if manifest.description.trim().is_empty() {
            errors.push("`description` must not be empty".to_string());
        }
        if manifest.publisher.trim().is_empty() {
            errors.push("`publisher` must not be empty".to_string());
        }
        if !entry_pattern().is_match(&manifest.entry) {
            errors.push(format!("`entry` must match `module:function`, got `{}`", manifest.entry));
        }

        let declared: HashSet<_> = manifest.permissions.iter().collect();
        if declared.len() != manifest.permissions.len() {
            errors.push("`permissions` must not contain duplicates".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PluginError::Manifest(errors.join("; ")))
        }
    }
}

impl Default for PluginManifestValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
