// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use chrono::Utc;
use kira_core::entity::{Entity, EntityType};
use kira_core::id::EntityId;
use tempfile::tempdir;

fn sample(id: &str) -> Entity {
    let ts = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
    let mut e = Entity::new(EntityId::new(id), EntityType::Task, ts);
    e.content = "body".to_string();
    e
}

#[test]
fn upsert_then_get_round_trips() {
    let dir = tempdir().unwrap();
    let store = VaultStore::new(dir.path(), true);
    let entity = sample("task-1");
    store.upsert(&entity).unwrap();
    let fetched = store.get(&entity.id).unwrap();
    assert_eq!(fetched, entity);
}

#[test]
fn get_missing_returns_not_found() {
    let dir = tempdir().unwrap();
    let store = VaultStore::new(dir.path(), true);
    let err = store.get(&EntityId::new("task-missing")).unwrap_err();
    assert!(matches!(err, VaultError::NotFound(_)));
}

#[test]
fn delete_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = VaultStore::new(dir.path(), true);
    let entity = sample("task-2");
    store.upsert(&entity).unwrap();
    store.delete(&entity.id).unwrap();
    store.delete(&entity.id).unwrap();
    assert!(store.get(&entity.id).is_err());
}

#[test]
fn list_returns_every_entity_of_type() {
    let dir = tempdir().unwrap();
    let store = VaultStore::new(dir.path(), true);
    store.upsert(&sample("task-a")).unwrap();
    store.upsert(&sample("task-b")).unwrap();

    let mut ids: Vec<String> = store
        .list(Some(EntityType::Task))
        .map(|r| r.unwrap().id.as_str().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["task-a".to_string(), "task-b".to_string()]);
}

#[test]
fn list_with_no_type_covers_all_directories() {
    let dir = tempdir().unwrap();
    let store = VaultStore::new(dir.path(), true);
    store.upsert(&sample("task-a")).unwrap();

    let mut note = sample("note-a");
    note.entity_type = EntityType::Note;
    store.upsert(&note).unwrap();

    let count = store.list(None).filter(|r| r.is_ok()).count();
    assert_eq!(count, 2);
}

#[test]
fn upsert_without_file_locks_still_writes() {
    let dir = tempdir().unwrap();
    let store = VaultStore::new(dir.path(), false);
    let entity = sample("task-solo");
    store.upsert(&entity).unwrap();
    assert_eq!(store.get(&entity.id).unwrap(), entity);
}
