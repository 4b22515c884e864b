//! `kiractl doctor` (C17): aggregated health checks.

use crate::prelude::*;

fn config_path(project: &Project) -> String {
    project.file("config.toml", "[vault]\ntz = \"UTC\"\n");
    project.path().join("config.toml").to_string_lossy().into_owned()
}

#[test]
fn doctor_on_fresh_vault_reports_ok_summary() {
    let project = Project::empty();
    let config = config_path(&project);
    // Ensure the vault directory (and audit directory) exist by issuing a
    // write first.
    project.kiractl().args(&["--config", &config, "--json", "task", "create", "--title", "Warm up vault"]).passes();

    let result = project.kiractl().args(&["--config", &config, "--json", "doctor"]).passes();
    let data = result.json_data("");
    assert_eq!(data.pointer("/summary/overall").and_then(|v| v.as_str()), Some("ok"));
    assert!(data.get("environment").is_some());
    assert!(data.get("vault").is_some());
    assert!(data.get("adapters").is_some());
    assert!(data.get("permissions").is_some());
}

#[test]
fn doctor_text_mode_prints_overall_status() {
    let project = Project::empty();
    let config = config_path(&project);
    project.kiractl().args(&["--config", &config, "task", "create", "--title", "Warm up vault"]).passes();
    project.kiractl().args(&["--config", &config, "doctor"]).passes().stdout_has("doctor");
}

#[test]
fn doctor_warns_when_config_path_is_missing() {
    let project = Project::empty();
    // HOME points into the tempdir so `~/.kira/config.toml` (the CLI's
    // default `--config`) is guaranteed absent here.
    project
        .kiractl()
        .env("HOME", project.path())
        .args(&["--json", "task", "create", "--title", "Warm up vault"])
        .passes();

    // No --config given: main.rs falls back to the (absent) default path,
    // which downgrades the environment check to a warning rather than a
    // hard failure.
    project.kiractl().env("HOME", project.path()).args(&["--json", "doctor"]).fails().code_is(2);
}
