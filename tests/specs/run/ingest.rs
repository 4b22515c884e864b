//! `kiractl run`: the Telegram->Task path and dedupe on a repeated
//! external id.

use crate::prelude::*;

#[test]
fn message_creates_task_with_source_tag() {
    let project = Project::empty();

    project
        .kiractl()
        .args(&["--json", "run", "Buy milk", "--source", "telegram", "--external-id", "telegram-12345"])
        .passes();

    let listed = project.kiractl().args(&["--json", "task", "list"]).passes();
    let tasks = listed.json_data("tasks");
    let tasks = tasks.as_array().expect("tasks array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].pointer("/metadata/title").and_then(|v| v.as_str()), Some("Buy milk"));
    assert_eq!(tasks[0].pointer("/metadata/status").and_then(|v| v.as_str()), Some("todo"));
    let tags = tasks[0].pointer("/metadata/tags").expect("tags present");
    assert_eq!(tags, &serde_json::json!(["telegram"]));
}

#[test]
fn duplicate_external_id_creates_no_second_task() {
    let project = Project::empty();

    project
        .kiractl()
        .args(&["--json", "run", "Buy milk", "--source", "telegram", "--external-id", "telegram-12345"])
        .passes();
    project
        .kiractl()
        .args(&["--json", "run", "Buy milk", "--source", "telegram", "--external-id", "telegram-12345"])
        .passes();

    assert_eq!(task_count_in_vault(&project), 1, "a repeated external id must not create a second task");
}

#[test]
fn three_distinct_messages_create_three_tasks() {
    let project = Project::empty();

    for (text, external_id) in [("Task A", "201"), ("Task B", "202"), ("Task C", "203")] {
        project.kiractl().args(&["--json", "run", text, "--source", "telegram", "--external-id", external_id]).passes();
    }

    let listed = project.kiractl().args(&["--json", "task", "list"]).passes();
    let tasks = listed.json_data("tasks");
    let titles: Vec<String> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.pointer("/metadata/title").and_then(|v| v.as_str()).unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles.len(), 3);
    for expected in ["Task A", "Task B", "Task C"] {
        assert!(titles.contains(&expected.to_string()), "missing task titled {expected}");
    }
}
