// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic event fingerprinting for the idempotency store (C2).
//!
//! Canonicalization: map keys are sorted recursively so two payloads that
//! differ only in key order hash identically; list order is preserved
//! (lists are semantically ordered, e.g. tag lists); string values have
//! internal whitespace runs collapsed to a single space and ends trimmed.

use crate::entity::MetaValue;
use indexmap::IndexMap;
use sha2::{Digest, Sha256};

fn normalize_str(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn canonical_json(value: &MetaValue) -> serde_json::Value {
    match value {
        MetaValue::Null => serde_json::Value::Null,
        MetaValue::Bool(b) => serde_json::Value::Bool(*b),
        MetaValue::Int(i) => serde_json::Value::from(*i),
        MetaValue::Float(f) => serde_json::json!(f),
        MetaValue::Str(s) => serde_json::Value::String(normalize_str(s)),
        MetaValue::List(items) => {
            serde_json::Value::Array(items.iter().map(canonical_json).collect())
        }
        MetaValue::Map(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut obj = serde_json::Map::new();
            for key in keys {
                obj.insert(key.clone(), canonical_json(&map[key]));
            }
            serde_json::Value::Object(obj)
        }
    }
}

/// Produces the deterministic event id `sha256(source|external_id|canonical_payload)`.
pub fn generate_event_id(
    source: &str,
    external_id: &str,
    payload: &IndexMap<String, MetaValue>,
) -> String {
    let canonical = canonical_json(&MetaValue::Map(payload.clone()));
    let serialized = serde_json::to_string(&canonical).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b"|");
    hasher.update(external_id.as_bytes());
    hasher.update(b"|");
    hasher.update(serialized.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
