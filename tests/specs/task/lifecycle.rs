//! Direct task CRUD through `kiractl task`, and the FSM guard rejecting
//! an illegal direct `todo -> done` transition.

use crate::prelude::*;

#[test]
fn create_then_get_round_trips_title() {
    let project = Project::empty();

    let created = project.kiractl().args(&["--json", "task", "create", "--title", "Buy milk"]).passes();
    let task_id = created.json_data("task_id").as_str().expect("task_id is a string").to_string();
    assert_eq!(created.json_data("status"), "todo");

    let fetched = project.kiractl().args(&["--json", "task", "get", &task_id]).passes();
    assert_eq!(fetched.json_data("metadata/title"), "Buy milk");
    assert_eq!(fetched.json_data("metadata/status"), "todo");
}

#[test]
fn create_with_tags_and_content() {
    let project = Project::empty();
    let created = project
        .kiractl()
        .args(&["--json", "task", "create", "--title", "Plan trip", "--tag", "travel", "--tag", "urgent", "--content", "Book flights"])
        .passes();
    let task_id = created.json_data("task_id").as_str().unwrap().to_string();

    let fetched = project.kiractl().args(&["--json", "task", "get", &task_id]).passes();
    assert_eq!(fetched.json_data("content"), "Book flights");
    let tags = fetched.json_data("metadata/tags");
    assert_eq!(tags, serde_json::json!(["travel", "urgent"]));
}

#[test]
fn list_returns_every_created_task() {
    let project = Project::empty();
    for title in ["Task A", "Task B", "Task C"] {
        project.kiractl().args(&["--json", "task", "create", "--title", title]).passes();
    }

    let listed = project.kiractl().args(&["--json", "task", "list"]).passes();
    let tasks = listed.json_data("tasks");
    let titles: Vec<String> = tasks
        .as_array()
        .expect("tasks is an array")
        .iter()
        .map(|t| t.pointer("/metadata/title").and_then(|v| v.as_str()).unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles.len(), 3);
    assert!(titles.contains(&"Task A".to_string()));
    assert!(titles.contains(&"Task B".to_string()));
    assert!(titles.contains(&"Task C".to_string()));
}

#[test]
fn fsm_allows_todo_doing_done_and_stamps_done_ts() {
    let project = Project::empty();
    let created = project.kiractl().args(&["--json", "task", "create", "--title", "Ship it"]).passes();
    let task_id = created.json_data("task_id").as_str().unwrap().to_string();

    project.kiractl().args(&["--json", "task", "update", &task_id, "--status", "doing"]).passes();
    project.kiractl().args(&["--json", "task", "update", &task_id, "--status", "done"]).passes();

    let fetched = project.kiractl().args(&["--json", "task", "get", &task_id]).passes();
    assert_eq!(fetched.json_data("metadata/status"), "done");
    assert!(fetched.json_data("done_ts").is_string(), "done_ts should be set once a task reaches done");
}

#[test]
fn fsm_rejects_invalid_transition() {
    let project = Project::empty();
    let created = project.kiractl().args(&["--json", "task", "create", "--title", "Needs doing first"]).passes();
    let task_id = created.json_data("task_id").as_str().unwrap().to_string();

    // todo -> done is not a legal direct transition (todo must pass through doing).
    project
        .kiractl()
        .args(&["--json", "task", "update", &task_id, "--status", "done"])
        .fails()
        .code_is(4);
}

#[test]
fn update_unknown_task_is_not_found() {
    let project = Project::empty();
    project
        .kiractl()
        .args(&["--json", "task", "update", "task-20260101-0000-missing", "--status", "doing"])
        .fails()
        .code_is(7);
}

#[test]
fn get_unknown_task_is_not_found() {
    let project = Project::empty();
    project.kiractl().args(&["--json", "task", "get", "task-20260101-0000-missing"]).fails().code_is(7);
}
