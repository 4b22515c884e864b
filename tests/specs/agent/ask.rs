//! Agent Graph (C13): `kiractl agent ask` against the canned
//! `FakeLlmProvider`, covering plan -> validate -> policy -> execute ->
//! respond.

use crate::prelude::*;

#[test]
fn ask_with_no_plan_just_responds() {
    let project = Project::empty();

    let result = project
        .kiractl()
        .args(&["--json", "agent", "ask", "hello there", "--plan", "[]", "--reply", "Hi, how can I help?"])
        .passes();

    assert_eq!(result.json_data("response").as_str(), Some("Hi, how can I help?"));
    assert_eq!(result.json_data("status").as_str(), Some("done"));
}

#[test]
fn ask_with_a_create_plan_executes_the_tool() {
    let project = Project::empty();
    let plan = serde_json::json!([
        {"tool": "task_create", "args": {"title": "From the agent"}}
    ])
    .to_string();

    project
        .kiractl()
        .args(&["--json", "--yes", "agent", "ask", "add a task", "--plan", &plan, "--reply", "Created it."])
        .passes();

    assert_eq!(task_count_in_vault(&project), 1);
    let listed = project.kiractl().args(&["--json", "task", "list"]).passes();
    let tasks = listed.json_data("tasks");
    assert_eq!(tasks[0].pointer("/metadata/title").and_then(|v| v.as_str()), Some("From the agent"));
}

#[test]
fn ask_with_a_delete_plan_is_blocked_by_default_policy() {
    let project = Project::empty();
    let created = project.kiractl().args(&["--json", "task", "create", "--title", "Throwaway"]).passes();
    let task_id = created.json_data("task_id").as_str().unwrap().to_string();

    let plan = serde_json::json!([
        {"tool": "task_delete", "args": {"id": task_id}}
    ])
    .to_string();

    project
        .kiractl()
        .args(&["--json", "--yes", "agent", "ask", "delete that task", "--plan", &plan, "--reply", "Deleted."])
        .fails()
        .code_is(6);
}
