//! `kiractl backup {create,restore,list,cleanup}` round-trip: backup then
//! restore must yield byte-identical entity files.

use crate::prelude::*;
use std::fs;

#[test]
fn backup_create_then_restore_round_trips_entity_file() {
    let project = Project::empty();
    project.file(
        "config.toml",
        &format!("[backup]\ndir = \"{}\"\nretention_count = 5\ncompress = true\n", project.path().join("backups").display()),
    );
    let config = project.path().join("config.toml").to_string_lossy().into_owned();

    let created = project
        .kiractl()
        .args(&["--config", &config, "--json", "task", "create", "--title", "Backed up task"])
        .passes();
    let task_id = created.json_data("task_id").as_str().unwrap().to_string();

    let backup = project.kiractl().args(&["--config", &config, "--json", "backup", "create"]).passes();
    let backup_path = backup.json_data("backup_path").as_str().unwrap().to_string();
    assert!(std::path::Path::new(&backup_path).exists());

    let restore_dir = project.path().join("restored");
    project
        .kiractl()
        .args(&["--config", &config, "--json", "backup", "restore", &backup_path, &restore_dir.to_string_lossy()])
        .passes();

    let original = fs::read_to_string(project.vault_path().join("tasks").join(format!("{task_id}.md"))).expect("original entity file");
    let restored = fs::read_to_string(restore_dir.join("tasks").join(format!("{task_id}.md"))).expect("restored entity file");
    assert_eq!(original, restored, "restored entity file must be byte-identical to the original");
}

#[test]
fn backup_restore_refuses_to_overwrite_without_flag() {
    let project = Project::empty();
    let backup_dir = project.path().join("backups");
    project.file(
        "config.toml",
        &format!("[backup]\ndir = \"{}\"\n", backup_dir.display()),
    );
    let config = project.path().join("config.toml").to_string_lossy().into_owned();

    project.kiractl().args(&["--config", &config, "--json", "task", "create", "--title", "One"]).passes();
    let backup = project.kiractl().args(&["--config", &config, "--json", "backup", "create"]).passes();
    let backup_path = backup.json_data("backup_path").as_str().unwrap().to_string();

    let restore_dir = project.path().join("restored");
    fs::create_dir_all(&restore_dir).unwrap();
    fs::write(restore_dir.join("sentinel"), "keep me").unwrap();

    project
        .kiractl()
        .args(&["--config", &config, "--json", "backup", "restore", &backup_path, &restore_dir.to_string_lossy()])
        .fails();

    assert!(restore_dir.join("sentinel").exists(), "refused restore must not touch the existing directory");

    project
        .kiractl()
        .args(&["--config", &config, "--json", "backup", "restore", &backup_path, &restore_dir.to_string_lossy(), "--overwrite"])
        .passes();
}

#[test]
fn backup_list_reports_created_archives() {
    let project = Project::empty();
    let backup_dir = project.path().join("backups");
    project.file("config.toml", &format!("[backup]\ndir = \"{}\"\n", backup_dir.display()));
    let config = project.path().join("config.toml").to_string_lossy().into_owned();

    project.kiractl().args(&["--config", &config, "--json", "task", "create", "--title", "One"]).passes();
    project.kiractl().args(&["--config", &config, "--json", "backup", "create"]).passes();

    let listed = project.kiractl().args(&["--config", &config, "--json", "backup", "list"]).passes();
    let backups = listed.json_data("backups");
    assert_eq!(backups.as_array().unwrap().len(), 1);
}
