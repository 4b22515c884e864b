// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn valid_manifest_json() -> serde_json::Value {
    json!({
        "name": "kira-deadlines",
        "version": "0.1.0",
        "display_name": "Deadlines",
        "description": "Flags tasks approaching their due date.",
        "publisher": "kira-team",
        "engines": {"kira": ">=0.1.0"},
        "permissions": ["vault_read", "event_subscribe"],
        "entry": "plugin:main",
        "capabilities": ["task_read"],
        "contributes": {"events": ["task.created"], "commands": []},
    })
}

#[test]
fn valid_manifest_passes() {
    let manifest: PluginManifest = serde_json::from_value(valid_manifest_json()).unwrap();
    assert!(PluginManifestValidator::new().validate(&manifest).is_ok());
}

#[test]
fn rejects_name_not_matching_kira_prefix() {
    let mut json = valid_manifest_json();
    json["name"] = json!("deadlines");
    let manifest: PluginManifest = serde_json::from_value(json).unwrap();
    let err = PluginManifestValidator::new().validate(&manifest).unwrap_err();
    assert!(matches!(err, PluginError::Manifest(msg) if msg.contains("name")));
}

#[test]
fn rejects_non_semver_version() {
    let mut json = valid_manifest_json();
    json["version"] = json!("v1");
    let manifest: PluginManifest = serde_json::from_value(json).unwrap();
    let err = PluginManifestValidator::new().validate(&manifest).unwrap_err();
    assert!(matches!(err, PluginError::Manifest(msg) if msg.contains("semver")));
}

#[test]
fn rejects_malformed_entry() {
    let mut json = valid_manifest_json();
    json["entry"] = json!("plugin.main");
    let manifest: PluginManifest = serde_json::from_value(json).unwrap();
    let err = PluginManifestValidator::new().validate(&manifest).unwrap_err();
    assert!(matches!(err, PluginError::Manifest(msg) if msg.contains("entry")));
}

#[test]
fn rejects_unknown_permission_at_parse_time() {
    let mut json = valid_manifest_json();
    json["permissions"] = json!(["network_raw"]);
    let result: Result<PluginManifest, _> = serde_json::from_value(json);
    assert!(result.is_err(), "unknown permission names must not deserialize");
}

#[test]
fn rejects_duplicate_permissions() {
    let mut json = valid_manifest_json();
    json["permissions"] = json!(["vault_read", "vault_read"]);
    let manifest: PluginManifest = serde_json::from_value(json).unwrap();
    let err = PluginManifestValidator::new().validate(&manifest).unwrap_err();
    assert!(matches!(err, PluginError::Manifest(msg) if msg.contains("duplicate")));
}

#[test]
fn rejects_blank_display_name() {
    let mut json = valid_manifest_json();
    json["display_name"] = json!("   ");
    let manifest: PluginManifest = serde_json::from_value(json).unwrap();
    assert!(PluginManifestValidator::new().validate(&manifest).is_err());
}

#[test]
fn validate_file_reads_and_validates_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kira-plugin.json");
    std::fs::write(&path, serde_json::to_string(&valid_manifest_json()).unwrap()).unwrap();

    let manifest = PluginManifestValidator::new().validate_file(&path).unwrap();
    assert_eq!(manifest.name, "kira-deadlines");
}
