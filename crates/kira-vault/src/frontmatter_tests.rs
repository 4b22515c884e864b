// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use indexmap::IndexMap;
use kira_core::entity::{Entity, EntityType, MetaValue};
use kira_core::id::EntityId;

fn sample() -> Entity {
    let ts = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
    let mut entity = Entity::new(EntityId::new("task-20260101-0900-buy-milk"), EntityType::Task, ts);
    entity.metadata.insert("title".to_string(), MetaValue::Str("Buy milk".to_string()));
    entity.metadata.insert("priority".to_string(), MetaValue::Int(2));
    entity
        .metadata
        .insert("tags".to_string(), MetaValue::List(vec![
            MetaValue::Str("errand".to_string()),
            MetaValue::Str("home".to_string()),
        ]));
    let mut nested = IndexMap::new();
    nested.insert("source".to_string(), MetaValue::Str("telegram".to_string()));
    entity.metadata.insert("origin".to_string(), MetaValue::Map(nested));
    entity.content = "Get 2% milk from the corner store.".to_string();
    entity
}

#[test]
fn encode_decode_round_trips() {
    let entity = sample();
    let text = encode(&entity);
    let decoded = decode(&text).expect("decode should succeed");
    assert_eq!(decoded, entity);
}

#[test]
fn encode_starts_with_sentinel_and_has_trailing_body() {
    let entity = sample();
    let text = encode(&entity);
    assert!(text.starts_with("---\n"));
    assert!(text.contains("title: Buy milk"));
    assert!(text.ends_with("Get 2% milk from the corner store."));
}

#[test]
fn decode_rejects_missing_sentinel() {
    let err = decode("no front matter here").unwrap_err();
    assert!(matches!(err, VaultError::Corrupt { .. }));
}

#[test]
fn done_ts_round_trips_when_present() {
    let mut entity = sample();
    entity.done_ts = Some(Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap());
    let text = encode(&entity);
    let decoded = decode(&text).unwrap();
    assert_eq!(decoded.done_ts, entity.done_ts);
}

#[test]
fn done_ts_omitted_when_absent() {
    let entity = sample();
    let text = encode(&entity);
    assert!(!text.contains("done_ts"));
}
