//! Policy Enforcer (C12) gating `task delete`: with default capabilities
//! `delete` is disabled, so `task_delete` is a policy violation; granting
//! `delete` and passing `--yes` lets it through.

use crate::prelude::*;

#[test]
fn delete_is_rejected_by_default_policy() {
    let project = Project::empty();
    let created = project.kiractl().args(&["--json", "task", "create", "--title", "Throwaway"]).passes();
    let task_id = created.json_data("task_id").as_str().unwrap().to_string();

    project
        .kiractl()
        .args(&["--json", "task", "delete", &task_id])
        .fails()
        .code_is(6);
}

#[test]
fn delete_with_delete_capability_and_confirmation_succeeds() {
    let project = Project::empty();
    project.file(
        "config.toml",
        "[policy]\nallowed_capabilities = [\"read\", \"create\", \"update\", \"export\", \"delete\"]\n",
    );
    let config_path = project.path().join("config.toml").to_string_lossy().into_owned();

    let created = project.kiractl().args(&["--config", &config_path, "--json", "task", "create", "--title", "Throwaway"]).passes();
    let task_id = created.json_data("task_id").as_str().unwrap().to_string();

    // Still rejected without --yes: task_delete is always confirmation-gated.
    project
        .kiractl()
        .args(&["--config", &config_path, "--json", "task", "delete", &task_id])
        .fails()
        .code_is(6);

    project
        .kiractl()
        .args(&["--config", &config_path, "--yes", "--json", "task", "delete", &task_id])
        .passes();

    project
        .kiractl()
        .args(&["--config", &config_path, "--json", "task", "get", &task_id])
        .fails()
        .code_is(7);
}
